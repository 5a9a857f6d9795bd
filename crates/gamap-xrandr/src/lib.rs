use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use gamap_core::gamma_triplet;

/// Build the xrandr invocation for one output. Execution is kept separate
/// so the argument vector can be checked without running anything.
fn xrandr_command(output: &str, gamma: f64) -> Command {
    let mut cmd = Command::new("xrandr");
    cmd.arg("--output").arg(output);
    cmd.arg("--gamma").arg(gamma_triplet(gamma));
    cmd
}

/// Apply `gamma` to all three channels of `output`.
///
/// A non-zero exit status from xrandr is not an error; a rejected value
/// just leaves the screen unchanged. Err only when xrandr cannot be
/// spawned at all.
pub fn set_gamma(output: &str, gamma: f64) -> Result<()> {
    info!("set_gamma {} {}", output, gamma);
    let status = xrandr_command(output, gamma)
        .status()
        .with_context(|| format!("failed to run xrandr for {output}"))?;
    if !status.success() {
        debug!("xrandr exited with {} for {}", status, output);
    }
    Ok(())
}

/// Apply the same gamma to every output in `outputs`, in order. Failures
/// are logged and skipped; outputs already updated stay updated.
pub fn set_gamma_for_all<S: AsRef<str>>(outputs: &[S], gamma: f64) {
    for_each_output(outputs, gamma, |output, gamma| {
        if let Err(e) = set_gamma(output, gamma) {
            warn!("set_gamma {} failed: {:#}", output, e);
        }
    });
}

fn for_each_output<S: AsRef<str>>(outputs: &[S], gamma: f64, mut apply: impl FnMut(&str, f64)) {
    for output in outputs {
        apply(output.as_ref(), gamma);
    }
}

/// Read the current gamma triplet of `output` from `xrandr --verbose`.
pub fn current_gamma(output: &str) -> Result<(f64, f64, f64)> {
    let out = Command::new("xrandr")
        .arg("--verbose")
        .stdout(Stdio::piped())
        .output()
        .context("failed to run xrandr --verbose")?;
    if !out.status.success() {
        return Err(anyhow!("xrandr --verbose failed: status {:?}", out.status));
    }
    let text = String::from_utf8_lossy(&out.stdout);
    parse_gamma(&text, output).ok_or_else(|| anyhow!("no gamma reported for output {}", output))
}

/// Find `output`'s section in verbose xrandr output and parse its Gamma
/// line. Section headers start at column zero with the output name.
fn parse_gamma(text: &str, output: &str) -> Option<(f64, f64, f64)> {
    let re_section = Regex::new(r"^(\S+) (connected|disconnected|unknown connection)").unwrap();
    let re_gamma = Regex::new(r"^\s+Gamma:\s*([0-9.]+):([0-9.]+):([0-9.]+)").unwrap();
    let mut in_section = false;
    for line in text.lines() {
        if let Some(c) = re_section.captures(line) {
            in_section = &c[1] == output;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some(c) = re_gamma.captures(line) {
            let r = c[1].parse().ok()?;
            let g = c[2].parse().ok()?;
            let b = c[3].parse().ok()?;
            return Some((r, g, b));
        }
    }
    None
}
