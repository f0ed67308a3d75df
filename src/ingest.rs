use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

use crate::errors::GeneratorError;

/// One row of the input dataset. Only `requirement_text` is required; the
/// other columns are carried through for reference but the pipeline assigns
/// its own synthetic identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub requirement_id: String,
    pub requirement_text: String,
    pub priority: String,
    pub category: String,
}

/// A cleaned requirement ready for the engine.
#[derive(Debug, Clone)]
pub struct Requirement {
    pub id: String,
    pub raw_text: String,
    /// `raw_text` with whitespace runs collapsed and surrounding whitespace
    /// trimmed.
    pub normalized_text: String,
}

pub struct RequirementsLoader {
    docx_pattern: Regex,
}

impl RequirementsLoader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            docx_pattern: Regex::new(r"^(R\d+)\s*:\s*(.+)$")?,
        })
    }

    /// Load requirement records from a single file, dispatching on the
    /// extension.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RequirementRecord>> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => self.load_csv(path),
            "xlsx" | "xls" => self.load_xlsx(path),
            "docx" => self.load_docx(path),
            other => Err(GeneratorError::UnsupportedInputFormat(other.to_string()).into()),
        }
    }

    /// Load and concatenate records from every supported file in a directory.
    pub fn load_directory<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<RequirementRecord>> {
        let mut records = Vec::new();
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() || !self.is_supported_format(entry.path()) {
                continue;
            }
            println!("📄 Loading {}", entry.path().display());
            match self.load(entry.path()) {
                Ok(mut file_records) => records.append(&mut file_records),
                Err(e) => eprintln!("⚠️  Skipped {}: {}", entry.path().display(), e),
            }
        }
        Ok(records)
    }

    pub fn is_supported_format<P: AsRef<Path>>(&self, path: P) -> bool {
        matches!(
            path.as_ref()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_lowercase())
                .as_deref(),
            Some("csv") | Some("xlsx") | Some("xls") | Some("docx")
        )
    }

    fn load_csv(&self, path: &Path) -> Result<Vec<RequirementRecord>> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let columns = self.resolve_columns(&headers, path);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let field = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i)).unwrap_or_default().to_string()
            };
            records.push(RequirementRecord {
                requirement_id: field(columns.id),
                requirement_text: field(Some(columns.text)),
                priority: field(columns.priority),
                category: field(columns.category),
            });
        }
        Ok(records)
    }

    fn load_xlsx(&self, path: &Path) -> Result<Vec<RequirementRecord>> {
        use calamine::{open_workbook_auto, Data, Reader};

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| anyhow::anyhow!("Failed to open Excel file: {}", e))?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Excel file contains no worksheets"))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| anyhow::anyhow!("Failed to read worksheet: {}", e))?;

        let cell_text = |cell: &Data| match cell {
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => format!("{:?}", dt),
            Data::DateTimeIso(dt) => dt.clone(),
            Data::DurationIso(dur) => dur.clone(),
            Data::Error(e) => format!("ERROR: {:?}", e),
            Data::Empty => String::new(),
        };

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(|c| cell_text(c).trim().to_string()).collect())
            .unwrap_or_default();
        let columns = self.resolve_columns(&headers, path);

        let mut records = Vec::new();
        for row in rows {
            let field = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i)).map(&cell_text).unwrap_or_default()
            };
            records.push(RequirementRecord {
                requirement_id: field(columns.id),
                requirement_text: field(Some(columns.text)),
                priority: field(columns.priority),
                category: field(columns.category),
            });
        }
        Ok(records)
    }

    /// DOCX ingestion: every paragraph matching `R<digits>: text` becomes a
    /// record with default priority and category. No matching paragraph is
    /// fatal.
    pub fn load_docx(&self, path: &Path) -> Result<Vec<RequirementRecord>> {
        let bytes = std::fs::read(path)?;
        let docx = docx_rs::read_docx(&bytes)
            .map_err(|e| anyhow::anyhow!("Failed to read DOCX file: {}", e))?;

        let mut records = Vec::new();
        for child in docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(para) = child {
                let mut text = String::new();
                for run in para.children {
                    if let docx_rs::ParagraphChild::Run(run_content) = run {
                        for run_child in run_content.children {
                            if let docx_rs::RunChild::Text(text_content) = run_child {
                                text.push_str(&text_content.text);
                            }
                        }
                    }
                }
                let text = text.trim();
                if let Some(captures) = self.docx_pattern.captures(text) {
                    records.push(RequirementRecord {
                        requirement_id: captures[1].to_string(),
                        requirement_text: captures[2].to_string(),
                        priority: "Medium".to_string(),
                        category: "general".to_string(),
                    });
                }
            }
        }

        if records.is_empty() {
            return Err(GeneratorError::NoRequirementPattern.into());
        }
        Ok(records)
    }

    /// Write DOCX-extracted records out as a CSV dataset.
    pub fn convert_docx_to_csv(&self, docx_path: &Path, csv_path: &Path) -> Result<()> {
        let records = self.load_docx(docx_path)?;
        let mut writer = csv::Writer::from_path(csv_path)?;
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Locate the text-bearing column. When `requirement_text` is absent the
    /// first column stands in for it, with a warning (recovered, not fatal).
    fn resolve_columns(&self, headers: &[String], path: &Path) -> ColumnMap {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let text = match find("requirement_text") {
            Some(i) => i,
            None => {
                eprintln!(
                    "⚠️  {}",
                    GeneratorError::MissingRequiredField { path: path.to_path_buf() }
                );
                eprintln!(
                    "   Using first column '{}' instead",
                    headers.first().map(String::as_str).unwrap_or("")
                );
                0
            }
        };

        ColumnMap {
            text,
            id: find("requirement_id"),
            priority: find("priority"),
            category: find("category"),
        }
    }
}

struct ColumnMap {
    text: usize,
    id: Option<usize>,
    priority: Option<usize>,
    category: Option<usize>,
}

/// Collapse whitespace runs and trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop blank rows and normalize the survivors. Rows without usable text
/// never enter the engine.
pub fn clean_requirements(records: &[RequirementRecord]) -> Vec<Requirement> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.requirement_text.trim().is_empty())
        .map(|(i, r)| {
            let id = if r.requirement_id.trim().is_empty() {
                format!("R{}", i + 1)
            } else {
                r.requirement_id.trim().to_string()
            };
            Requirement {
                id,
                raw_text: r.requirement_text.clone(),
                normalized_text: normalize_text(&r.requirement_text),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_supported_format() {
        let loader = RequirementsLoader::new().unwrap();

        assert!(loader.is_supported_format("reqs.csv"));
        assert!(loader.is_supported_format("reqs.xlsx"));
        assert!(loader.is_supported_format("reqs.docx"));
        assert!(!loader.is_supported_format("reqs.pdf"));
        assert!(!loader.is_supported_format("reqs"));
    }

    #[test]
    fn test_unsupported_extension_is_fatal() {
        let loader = RequirementsLoader::new().unwrap();
        let err = loader.load("requirements.pdf").unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("  The   user\tuploads\n a file  "), "The user uploads a file");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_clean_drops_blank_rows() {
        let records = vec![
            RequirementRecord {
                requirement_id: "R1".to_string(),
                requirement_text: "The user logs in".to_string(),
                priority: String::new(),
                category: String::new(),
            },
            RequirementRecord {
                requirement_id: "R2".to_string(),
                requirement_text: "   ".to_string(),
                priority: String::new(),
                category: String::new(),
            },
        ];
        let cleaned = clean_requirements(&records);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].id, "R1");
        assert_eq!(cleaned[0].normalized_text, "The user logs in");
    }

    #[test]
    fn test_csv_with_standard_columns() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "requirement_id,requirement_text,priority,category").unwrap();
        writeln!(file, "R1,The user can upload a file,High,general").unwrap();
        writeln!(file, "R2,The admin can delete accounts,Low,general").unwrap();
        file.flush().unwrap();

        let loader = RequirementsLoader::new().unwrap();
        let records = loader.load(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].requirement_text, "The user can upload a file");
        assert_eq!(records[1].requirement_id, "R2");
    }

    #[test]
    fn test_csv_missing_text_column_falls_back_to_first() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "description,owner").unwrap();
        writeln!(file, "The user can search orders,qa").unwrap();
        file.flush().unwrap();

        let loader = RequirementsLoader::new().unwrap();
        let records = loader.load(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].requirement_text, "The user can search orders");
    }
}
