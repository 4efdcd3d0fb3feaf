use super::{emit, OutputTarget};
use crate::config::FunnelmapConfig;
use crate::io::Report;
use anyhow::Result;

pub fn run_rates(output: OutputTarget, settings: &FunnelmapConfig) -> Result<()> {
    emit(&Report::rate_tables(), &output, settings)
}
