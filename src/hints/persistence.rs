use std::path::Path;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{Hint, HintType};
use crate::service::Dbms;

/// Minimum similarity for suggesting a parameter name.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// One row of a hint CSV file.
#[derive(Debug, Serialize, Deserialize)]
struct HintRow {
    document_id: usize,
    parameter: String,
    value: String,
    hint_type: HintType,
    #[serde(default)]
    passage: String,
}

/// Load hints from a CSV file with columns
/// `document_id,parameter,value,hint_type,passage`.
///
/// Fails on the first row whose value is not numerical.
pub fn load_hints<P: AsRef<Path>>(path: P) -> Result<Vec<Hint>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut hints = Vec::new();
    for row in reader.deserialize() {
        let row: HintRow = row?;
        hints.push(Hint::new(
            row.document_id,
            row.parameter,
            row.value,
            row.hint_type,
            row.passage,
        )?);
    }
    info!(count = hints.len(), "loaded hints");
    Ok(hints)
}

/// Save hints to a CSV file readable by [`load_hints`].
pub fn save_hints<P: AsRef<Path>>(path: P, hints: &[Hint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for hint in hints {
        writer.serialize(HintRow {
            document_id: hint.document_id,
            parameter: hint.parameter.clone(),
            value: hint.raw_value.clone(),
            hint_type: hint.hint_type,
            passage: hint.passage.clone(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Keep only hints about parameters the system knows.
///
/// Dropped parameters are logged, with a close match if one exists.
pub fn filter_known(hints: Vec<Hint>, dbms: &dyn Dbms) -> Vec<Hint> {
    let known = dbms.list_parameters();
    let (kept, dropped): (Vec<Hint>, Vec<Hint>) = hints
        .into_iter()
        .partition(|h| known.iter().any(|p| *p == h.parameter));

    for hint in &dropped {
        let suggestion = known
            .iter()
            .map(|p| (p, jaro_winkler(&p.to_lowercase(), &hint.parameter.to_lowercase())))
            .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match suggestion {
            Some((name, _)) => warn!(
                parameter = %hint.parameter,
                suggestion = %name,
                "dropping hint for unknown parameter, did you mean the suggestion?"
            ),
            None => warn!(parameter = %hint.parameter, "dropping hint for unknown parameter"),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TunerError;
    use crate::service::{SimulatedDbms, SimulationModel};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_hints() {
        let csv = "document_id,parameter,value,hint_type,passage\n\
                   0,shared_buffers,25%,ram_ratio,Set shared_buffers to 25% of RAM\n\
                   1,work_mem,64MB,absolute,\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let hints = load_hints(file.path()).unwrap();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].hint_type, HintType::RamRatio);
        assert_eq!(hints[0].value, 0.25);
        assert_eq!(hints[1].unit, "MB");
        assert_eq!(hints[1].passage, "");
    }

    #[test]
    fn test_load_rejects_non_numeric_value() {
        let csv = "document_id,parameter,value,hint_type,passage\n0,fsync,off,absolute,\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        assert!(matches!(
            load_hints(file.path()),
            Err(TunerError::InvalidHint { .. })
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let hints = vec![
            Hint::new(4, "work_mem", "16MB", HintType::Absolute, "a, quoted \"passage\"").unwrap(),
        ];
        let file = NamedTempFile::new().unwrap();
        save_hints(file.path(), &hints).unwrap();

        let reloaded = load_hints(file.path()).unwrap();
        assert_eq!(reloaded, hints);
    }

    #[test]
    fn test_filter_known() {
        let model: SimulationModel = serde_json::from_str(
            r#"{"objective": "time", "base_performance": 100.0,
                "parameters": {"work_mem": {"default": "4MB"}}}"#,
        )
        .unwrap();
        let dbms = SimulatedDbms::new(model);
        let hints = vec![
            Hint::new(0, "work_mem", "8MB", HintType::Absolute, "").unwrap(),
            Hint::new(0, "work_mme", "8MB", HintType::Absolute, "").unwrap(),
        ];

        let kept = filter_known(hints, &dbms);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].parameter, "work_mem");
    }
}
