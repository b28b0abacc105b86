use crate::{
    config::Config,
    extract,
    probe::StatusProbe,
    record::{AnnotatedRecord, UrlRecord},
    report::{self, JsonReport},
    util::now_rfc3339,
};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

pub struct Pipeline<P: StatusProbe> {
    cfg: Config,
    prober: P,
}

/// How a run ended. Only `Reported` leaves a file behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    InputMissing,
    NoUrls,
    AllHealthy { checked: usize },
    Reported { output: PathBuf, checked: usize, broken: usize },
}

impl<P: StatusProbe> Pipeline<P> {
    pub fn new(cfg: &Config, prober: P) -> Self {
        Self {
            cfg: cfg.clone(),
            prober,
        }
    }

    /// Extract, probe, report. Operator-facing progress goes to `console`.
    pub fn run(
        &self,
        input: &Path,
        output_override: Option<&Path>,
        console: &mut dyn Write,
    ) -> Result<RunOutcome> {
        if !input.exists() {
            writeln!(console, "File not found: {}", input.display())?;
            return Ok(RunOutcome::InputMissing);
        }

        writeln!(console, "\nScanning {} for URLs...", input.display())?;
        let urls = self.extract(input, console)?;
        if urls.is_empty() {
            writeln!(console, "No URLs found in the Excel file.")?;
            return Ok(RunOutcome::NoUrls);
        }

        writeln!(console, "Found {} URL(s). Checking status...", urls.len())?;
        let started = Instant::now();
        let annotated = self.probe_all(urls, console)?;
        info!(
            "probed {} url(s) in {:.1}s",
            annotated.len(),
            started.elapsed().as_secs_f64()
        );

        let broken = report::broken(&annotated);
        if broken.is_empty() {
            writeln!(console, "\nNo broken URLs found!")?;
            return Ok(RunOutcome::AllHealthy {
                checked: annotated.len(),
            });
        }

        let output = match output_override {
            Some(p) => p.to_path_buf(),
            None => report::output_path(input, &self.cfg.output.suffix)?,
        };
        if output.as_path() == input || report::same_file(&output, input) {
            return Err(anyhow!(
                "refusing to overwrite the input with the report: {}",
                output.display()
            ));
        }

        if let Err(err) = self.write_outputs(input, &output, annotated.len(), &broken) {
            writeln!(console, "\nFailed to write report: {err:#}")?;
            return Err(err);
        }

        writeln!(console, "\n✓ Report generated successfully!")?;
        writeln!(console, "Found {} broken URL(s)", broken.len())?;
        writeln!(console, "Output file: {}", output.display())?;

        Ok(RunOutcome::Reported {
            output,
            checked: annotated.len(),
            broken: broken.len(),
        })
    }

    /// A workbook that cannot be read counts as having no URLs.
    fn extract(&self, input: &Path, console: &mut dyn Write) -> Result<Vec<UrlRecord>> {
        match extract::scan_workbook(&self.cfg.scan, input) {
            Ok(urls) => {
                info!("found {} url(s) in {}", urls.len(), input.display());
                Ok(urls)
            }
            Err(err) => {
                warn!("scan failed for {}: {err:#}", input.display());
                writeln!(console, "Error reading Excel file: {err:#}")?;
                Ok(Vec::new())
            }
        }
    }

    fn probe_all(
        &self,
        urls: Vec<UrlRecord>,
        console: &mut dyn Write,
    ) -> Result<Vec<AnnotatedRecord>> {
        let total = urls.len();
        let mut annotated = Vec::with_capacity(total);
        for (i, record) in urls.into_iter().enumerate() {
            let status = self.prober.probe(&record.url);
            writeln!(
                console,
                "[{}/{}] {} - Status: {}",
                i + 1,
                total,
                record.url,
                status
            )?;
            annotated.push(AnnotatedRecord { record, status });
        }
        Ok(annotated)
    }

    fn write_outputs(
        &self,
        input: &Path,
        output: &Path,
        checked: usize,
        broken: &[AnnotatedRecord],
    ) -> Result<()> {
        report::write_xlsx(output, &self.cfg.output.sheet_name, broken)?;
        info!("wrote {} broken url(s) to {}", broken.len(), output.display());

        if self.cfg.output.write_report_json {
            let json_path = report::json_path(output);
            let doc = JsonReport {
                input: input.display().to_string(),
                generated: now_rfc3339(),
                checked,
                broken_count: broken.len(),
                broken,
            };
            report::write_json(&json_path, &doc)
                .with_context(|| format!("json report for {}", output.display()))?;
        }
        Ok(())
    }
}
