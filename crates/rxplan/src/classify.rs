// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rxplan classify` command implementation.

use clap::Args;
use rxplan_config::RxplanConfig;
use rxplan_core::{CardFields, ClassificationResult, RxplanError};

use crate::serve::{Pipeline, init_tracing};

/// Card fields and loading options for `rxplan classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    #[arg(long)]
    pub member_id: Option<String>,
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long)]
    pub bin: Option<String>,
    #[arg(long)]
    pub pcn: Option<String>,
    /// Print the wire-format JSON result.
    #[arg(long)]
    pub json: bool,
    /// Use cached reference files only; no downloads.
    #[arg(long)]
    pub offline: bool,
}

pub async fn run_classify(config: &RxplanConfig, args: ClassifyArgs) -> Result<(), RxplanError> {
    init_tracing(&config.server.log_level);

    let pipeline = Pipeline::from_config(config)?;
    if args.offline {
        pipeline.refresher.load_cached().await;
    } else {
        pipeline.refresher.refresh_all().await;
    }

    let fields = CardFields {
        member_id: args.member_id,
        group: args.group,
        bin: args.bin,
        pcn: args.pcn,
    };
    let result = pipeline.engine.classify(&fields);

    if args.json {
        let json = serde_json::to_string(&result)
            .map_err(|e| RxplanError::Internal(format!("failed to encode result: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", format_result(&result));
    }
    Ok(())
}

fn format_result(result: &ClassificationResult) -> String {
    format!("{} (confidence {:.2})", result.plan, result.confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_output() {
        let r = ClassificationResult {
            plan: "State Medicaid".into(),
            confidence: 0.99,
        };
        assert_eq!(format_result(&r), "State Medicaid (confidence 0.99)");
        assert_eq!(
            format_result(&ClassificationResult::unknown()),
            "Unknown – manual review (confidence 0.00)"
        );
    }
}
