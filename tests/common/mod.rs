//! Common test utilities for evaluation integration tests.

#![allow(dead_code)]

use rand::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tc_evaluation::*;

/// Three documents, classes A/B/C; gold A,B,C predicted A,C,C.
pub const SINGLE_LABEL_LOG: &str = "#ID=PREDICTION;GOLDSTANDARD;THRESHOLD\n\
                                    #labels 0=A 1=B 2=C\n\
                                    doc1=0;0\n\
                                    doc2=2;1\n\
                                    doc3=2;2\n";

/// Two records over X/Y with threshold 0.5.
pub const MULTI_LABEL_LOG: &str = "#ID=PREDICTION;GOLDSTANDARD;THRESHOLD\n\
                                   #labels 0=X 1=Y\n\
                                   r1=1,0;1,0;0.5\n\
                                   r2=1,1;0,1;0.5\n";

/// Small regression log with a perfect rank order.
pub const REGRESSION_LOG: &str = "#ID=PREDICTION;GOLDSTANDARD;THRESHOLD\n\
                                  #labels\n\
                                  s1=1.0;1.5\n\
                                  s2=2.0;2.5\n\
                                  s3=3.0;3.0\n\
                                  s4=5.0;4.0\n";

/// Parse a log held in memory.
pub fn parse_log(mode: LearningMode, log: &str) -> OutcomeCollection {
    OutcomeParser::new(mode)
        .parse_str(log)
        .expect("test log should parse")
}

/// Write `content` to `dir/name` and return the path.
pub fn write_log(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write test log");
    path
}

/// Build a random multi-label log with `num_records` records over
/// `num_labels` labels. Scores are drawn uniformly, the threshold is 0.5.
pub fn random_multi_label_log(seed: u64, num_records: usize, num_labels: usize) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut log = String::from("#ID=PREDICTION;GOLDSTANDARD;THRESHOLD\n#labels");
    for i in 0..num_labels {
        log.push_str(&format!(" {}=label{}", i, i));
    }
    log.push('\n');

    for r in 0..num_records {
        let prediction: Vec<String> = (0..num_labels)
            .map(|_| format!("{:.3}", rng.gen_range(0.0..1.0)))
            .collect();
        let gold: Vec<String> = (0..num_labels)
            .map(|_| if rng.gen_bool(0.3) { "1" } else { "0" }.to_string())
            .collect();
        log.push_str(&format!(
            "doc{}={};{};0.5\n",
            r,
            prediction.join(","),
            gold.join(",")
        ));
    }
    log
}

/// Build a random single-label log over `num_labels` classes.
pub fn random_single_label_log(seed: u64, num_records: usize, num_labels: usize) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut log = String::from("#labels");
    for i in 0..num_labels {
        log.push_str(&format!(" {}=class{}", i, i));
    }
    log.push('\n');
    for r in 0..num_records {
        log.push_str(&format!(
            "doc{}={};{}\n",
            r,
            rng.gen_range(0..num_labels),
            rng.gen_range(0..num_labels)
        ));
    }
    log
}

/// Assert two floats agree to 1e-10.
pub fn assert_close(actual: f64, expected: f64) {
    approx::assert_abs_diff_eq!(actual, expected, epsilon = 1e-10);
}
