//! Outcome log writer.
//!
//! Serializes a collection back into the log format. Records are first
//! homogenized onto the collection's global label universe, so logs merged
//! from several folds come out with one shared `#labels` header.

use crate::core::constants::*;
use crate::core::encoding::encode_label;
use crate::core::error::{EvaluationError, Result};
use crate::core::types::LearningMode;
use crate::outcome::collection::OutcomeCollection;
use crate::outcome::record::OutcomeRecord;
use crate::universe::{LabelUniverse, ResolvedOutcomes};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Reproject every record onto the global label universe.
///
/// Labels a record did not carry get gold and prediction `0.0`. Regression
/// collections are returned unchanged.
pub fn homogenize(collection: &OutcomeCollection) -> Result<OutcomeCollection> {
    let mode = collection
        .learning_mode()
        .ok_or_else(|| EvaluationError::mode("collection has no learning mode"))?;
    if mode == LearningMode::Regression {
        return Ok(collection.clone());
    }

    let resolved = ResolvedOutcomes::resolve(collection);
    let labels = resolved.universe().labels().to_vec();
    let mut homogenized = OutcomeCollection::new(mode);
    for (record, mapping) in resolved.entries() {
        let (gold, prediction) = mapping.reproject(record);
        homogenized.insert(OutcomeRecord::new(
            record.id(),
            gold,
            prediction,
            record.threshold(),
            labels.clone(),
        )?);
    }
    Ok(homogenized)
}

/// Write `collection` in outcome log format.
pub fn write_outcomes<W: Write>(collection: &OutcomeCollection, mut writer: W) -> Result<()> {
    let mode = collection
        .learning_mode()
        .ok_or_else(|| EvaluationError::mode("collection has no learning mode"))?;
    let homogenized = homogenize(collection)?;
    let universe = match mode {
        LearningMode::Regression => LabelUniverse::default(),
        _ => LabelUniverse::from_collection(&homogenized),
    };

    writeln!(writer, "{}", FORMAT_HEADER)?;
    write!(writer, "{}", LABELS_HEADER)?;
    for (i, label) in universe.labels().iter().enumerate() {
        write!(writer, " {}{}{}", i, ID_SEPARATOR, encode_label(label))?;
    }
    writeln!(writer)?;

    for record in homogenized.outcomes() {
        let (prediction, gold) = match mode {
            LearningMode::SingleLabel => {
                let (gold, predicted) = record.single_label_pair()?;
                (
                    index_field(&universe, predicted)?,
                    index_field(&universe, gold)?,
                )
            }
            LearningMode::MultiLabel => (
                decimal_field(record.prediction()),
                decimal_field(record.gold()),
            ),
            LearningMode::Regression => (
                scalar_field(record.prediction_scalar()),
                scalar_field(record.gold_scalar()),
            ),
        };
        write!(
            writer,
            "{}{}{}{}{}",
            record.id(),
            ID_SEPARATOR,
            prediction,
            FIELD_SEPARATOR,
            gold
        )?;
        if record.has_threshold() {
            write!(writer, "{}{}", FIELD_SEPARATOR, record.threshold())?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `collection` to a file.
pub fn write_outcomes_file<P: AsRef<Path>>(collection: &OutcomeCollection, path: P) -> Result<()> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    write_outcomes(collection, writer)?;
    log::info!(
        "Wrote {} outcomes to {}",
        collection.len(),
        path.as_ref().display()
    );
    Ok(())
}

fn index_field(universe: &LabelUniverse, label: &str) -> Result<String> {
    universe
        .index_of(label)
        .map(|i| i.to_string())
        .ok_or_else(|| EvaluationError::internal(format!("label '{}' missing from universe", label)))
}

fn decimal_field(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.3}", v))
        .collect::<Vec<_>>()
        .join(&VALUE_SEPARATOR.to_string())
}

fn scalar_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::parser::OutcomeParser;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_homogenize_fills_missing_labels_with_zero() {
        let collection = OutcomeCollection::from_records(
            LearningMode::MultiLabel,
            vec![
                OutcomeRecord::new("1", vec![1.0], vec![0.9], 0.5, labels(&["b"])).unwrap(),
                OutcomeRecord::new("2", vec![0.0, 1.0], vec![1.0, 1.0], 0.5, labels(&["c", "a"]))
                    .unwrap(),
            ],
        );
        let homogenized = homogenize(&collection).unwrap();
        for record in homogenized.outcomes() {
            assert_eq!(record.labels(), &["a", "b", "c"]);
        }
        let first = homogenized.outcomes().find(|o| o.id() == "1").unwrap();
        assert_eq!(first.gold(), &[0.0, 1.0, 0.0]);
        assert_eq!(first.prediction(), &[0.0, 0.9, 0.0]);
    }

    #[test]
    fn test_write_single_label_uses_indices() {
        let log = "#labels 0=B 1=A\nd1=0;1\nd2=1;1\n";
        let collection = OutcomeParser::new(LearningMode::SingleLabel).parse_str(log).unwrap();

        let mut buffer = Vec::new();
        write_outcomes(&collection, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with(FORMAT_HEADER));
        assert!(text.contains("#labels 0=A 1=B\n"));
        // global order is sorted, so B became index 1 and A index 0
        assert!(text.contains("d1=1;0\n"));
        assert!(text.contains("d2=0;0\n"));
    }

    #[test]
    fn test_write_then_parse_multi_label() {
        let log = "#labels 0=x+y 1=z\nr1=0.25,1;1,0;0.5\nr2=0,0;0,1;0.5\n";
        let parser = OutcomeParser::new(LearningMode::MultiLabel);
        let collection = parser.parse_str(log).unwrap();

        let mut buffer = Vec::new();
        write_outcomes(&collection, &mut buffer).unwrap();
        let reparsed = parser.parse(buffer.as_slice()).unwrap();

        assert_eq!(reparsed, collection);
    }

    #[test]
    fn test_write_regression() {
        let log = "#labels\ns1=2.5;3;-1\ns2=1;1.5;0.5\n";
        let collection = OutcomeParser::new(LearningMode::Regression).parse_str(log).unwrap();
        let mut buffer = Vec::new();
        write_outcomes(&collection, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("#labels\n"));
        assert!(text.contains("s1=2.5;3\n"));
        assert!(text.contains("s2=1;1.5;0.5\n"));
    }

    #[test]
    fn test_write_without_mode_fails() {
        let collection = OutcomeCollection::empty();
        let err = write_outcomes(&collection, Vec::new()).unwrap_err();
        assert!(matches!(err, EvaluationError::Mode { .. }));
    }
}
