use photometer::{HistoryRecord, RequestKind};
use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
    pub footer: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }
        table.with(Style::blank());
        table
    }
}

/// One history entry as a table row. Missing numbers render as `-`.
#[derive(Debug, Clone, Tabled)]
pub struct HistoryRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Captured")]
    pub captured_at: String,
    #[tabled(rename = "Kind")]
    pub kind: RequestKind,
    #[tabled(rename = "Concentration")]
    pub concentration: String,
    #[tabled(rename = "Absorbance")]
    pub absorbance: String,
    #[tabled(rename = "RGB")]
    pub rgb: String,
    #[tabled(rename = "Color")]
    pub color: String,
}

impl HistoryRow {
    pub fn new(index: usize, record: &HistoryRecord) -> Self {
        Self {
            index,
            captured_at: record
                .captured_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            kind: record.request_kind,
            concentration: record.concentration_text.clone().unwrap_or_else(|| "-".into()),
            absorbance: record.absorbance_text.clone().unwrap_or_else(|| "-".into()),
            rgb: record.rgb_text.clone(),
            color: record.color_type.to_string(),
        }
    }
}
