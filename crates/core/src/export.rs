//! Export artifacts for bulk export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Column headers of the CSV export.
pub const CSV_HEADERS: [&str; 8] = [
    "ID",
    "Nome",
    "Descrição",
    "Preço",
    "Categoria",
    "Estoque",
    "Destaque",
    "Avaliação",
];

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid export format: {s} (expected csv or json)")),
        }
    }
}

/// A downloadable file produced by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// `produtos_<YYYY-MM-DD>.<ext>`
    pub filename: String,
    pub mime_type: &'static str,
    pub content: Vec<u8>,
}

impl ExportArtifact {
    /// Encode `products` in `format`, naming the file after `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn build(
        products: &[Product],
        format: ExportFormat,
        date: NaiveDate,
    ) -> Result<Self, serde_json::Error> {
        let content = match format {
            ExportFormat::Csv => to_csv(products).into_bytes(),
            ExportFormat::Json => serde_json::to_string_pretty(products)?.into_bytes(),
        };

        Ok(Self {
            filename: format!("produtos_{}.{}", date.format("%Y-%m-%d"), format.extension()),
            mime_type: format.mime_type(),
            content,
        })
    }
}

/// Render products as CSV.
///
/// Every cell is wrapped in double quotes (embedded quotes are doubled) and
/// rows are separated by `\n` with no trailing newline.
#[must_use]
pub fn to_csv(products: &[Product]) -> String {
    let header = CSV_HEADERS.map(str::to_owned);
    let rows = products.iter().map(|p| {
        [
            p.id.to_string(),
            p.name.clone(),
            p.description.clone(),
            p.price.normalize().to_string(),
            p.category.name().to_owned(),
            p.stock.to_string(),
            if p.featured { "Sim" } else { "Não" }.to_owned(),
            p.rating.to_string(),
        ]
    });

    std::iter::once(header)
        .chain(rows)
        .map(|row| {
            row.iter()
                .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::query::fixtures::sample_products;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let mut products = sample_products();
        products.truncate(1);
        if let Some(p) = products.first_mut() {
            p.featured = true;
        }

        let csv = to_csv(&products);
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(
            lines,
            [
                concat!(
                    r#""ID","Nome","Descrição","Preço","#,
                    r#""Categoria","Estoque","Destaque","Avaliação""#,
                ),
                concat!(
                    r#""1","iPhone 15 Pro","Smartphone Apple","8999.99","#,
                    r#""Eletrônicos","10","Sim","4.8""#,
                ),
            ]
        );
    }

    #[test]
    fn test_csv_escapes_quotes() {
        let mut products = sample_products();
        products.truncate(1);
        if let Some(p) = products.first_mut() {
            p.name = "Tela 15\" OLED".to_owned();
        }

        let csv = to_csv(&products);
        assert!(csv.contains("\"Tela 15\"\" OLED\""));
    }

    #[test]
    fn test_csv_of_nothing_is_header_only() {
        assert_eq!(to_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn test_csv_artifact() {
        let artifact =
            ExportArtifact::build(&sample_products(), ExportFormat::Csv, date()).unwrap();
        assert_eq!(artifact.filename, "produtos_2025-03-09.csv");
        assert_eq!(artifact.mime_type, "text/csv");
        assert_eq!(String::from_utf8(artifact.content).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_json_artifact_is_pretty_product_list() {
        let products = sample_products();
        let artifact = ExportArtifact::build(&products, ExportFormat::Json, date()).unwrap();
        assert_eq!(artifact.filename, "produtos_2025-03-09.json");
        assert_eq!(artifact.mime_type, "application/json");

        let text = String::from_utf8(artifact.content).unwrap();
        assert!(text.contains("\n  {"));
        let decoded: serde_json::Value = serde_json::from_str(&text).unwrap();
        let ids: Vec<&str> = decoded
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["id"].as_str())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(decoded[0]["category"], "Eletrônicos");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
