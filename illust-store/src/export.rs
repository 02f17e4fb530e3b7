use std::path::{Path, PathBuf};

use time::Date;

use crate::domain::date::COMPACT_DATE;
use crate::domain::Project;

const BOM: char = '\u{feff}';
const HEADERS: [&str; 6] = [
    "案件名",
    "カテゴリ",
    "単価(円)",
    "作業時間(h)",
    "納品日",
    "ステータス",
];

/// A ready-to-save CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub contents: String,
}

impl CsvExport {
    /// Writes the file into `dir` and returns its full path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// Renders projects as comma-separated rows behind a UTF-8 BOM. Fields are
/// written as-is: a comma inside a title is not escaped. Returns `None` when
/// there is nothing to export.
pub fn export_csv(projects: &[Project], today: Date) -> Option<CsvExport> {
    if projects.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(projects.len() + 1);
    lines.push(HEADERS.join(","));
    for project in projects {
        lines.push(
            [
                project.title.clone(),
                project.category.to_string(),
                project.price.to_string(),
                project.hours.to_string(),
                project.delivery_date_iso(),
                project.status.to_string(),
            ]
            .join(","),
        );
    }

    Some(CsvExport {
        filename: format!(
            "illustdash_projects_{}.csv",
            today.format(COMPACT_DATE).unwrap_or_default()
        ),
        contents: format!("{}{}", BOM, lines.join("\n")),
    })
}
