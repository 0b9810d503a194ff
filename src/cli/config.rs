//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::{
    config::{ProcessingConfig, RemovalStrategy, SizeSpec},
    models::ModelSource,
};
use anyhow::{Context, Result};

/// Convert CLI arguments to a `ProcessingConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a validated `ProcessingConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<ProcessingConfig> {
        let size = Self::size_from_cli(cli)?;

        ProcessingConfig::builder()
            .removal(Self::removal_from_cli(cli))
            .size(size)
            .build()
            .context("Invalid configuration")
    }

    fn removal_from_cli(cli: &Cli) -> Option<RemovalStrategy> {
        if cli.no_remove_bg {
            return None;
        }

        if cli.simple {
            Some(RemovalStrategy::ColorThreshold {
                threshold: cli.threshold,
            })
        } else {
            let model = cli
                .model
                .clone()
                .map_or(ModelSource::Default, ModelSource::External);
            Some(RemovalStrategy::Segmentation { model })
        }
    }

    fn size_from_cli(cli: &Cli) -> Result<Option<SizeSpec>> {
        match (&cli.size, cli.max_size) {
            (Some(size), _) => {
                let spec = size
                    .parse::<SizeSpec>()
                    .with_context(|| format!("Cannot parse --size '{size}'"))?;
                Ok(Some(spec))
            },
            (None, Some(max)) => Ok(Some(SizeSpec::MaxDimension(max))),
            (None, None) => Ok(None),
        }
    }
}
