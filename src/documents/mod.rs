// Document formatting
// Turns typed records into sentences suitable for embedding


use std::fmt;

use serde::{Deserialize, Serialize};

use crate::records::{CustomerRecord, SalesData, SalesRepRecord};

/// Text to embed, plus the record it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub source: Option<DocumentSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub kind: RecordKind,
    pub record_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    SalesRep,
    Customer,
}

impl RecordKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesRep => "sales_rep",
            Self::Customer => "customer",
        }
    }

    #[inline]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sales_rep" => Some(Self::SalesRep),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that can be rendered as a searchable sentence.
///
/// Every field that carries meaning is written out so the embedding sees the
/// whole record rather than a summary of it.
pub trait ToDocument {
    fn to_document(&self) -> Document;
}

impl ToDocument for SalesRepRecord {
    #[inline]
    fn to_document(&self) -> Document {
        Document {
            text: format!(
                "Sales Rep {} manages {} customers. Monthly revenue is ${}. Target is ${}. Conversion rate is {}.",
                self.rep_id, self.customers, self.monthly_revenue, self.target, self.conversion_rate
            ),
            source: Some(DocumentSource {
                kind: RecordKind::SalesRep,
                record_id: self.rep_id.clone(),
            }),
        }
    }
}

impl ToDocument for CustomerRecord {
    #[inline]
    fn to_document(&self) -> Document {
        Document {
            text: format!(
                "Customer {} has average monthly sales of ${}.",
                self.customer_id, self.avg_monthly_sales
            ),
            source: Some(DocumentSource {
                kind: RecordKind::Customer,
                record_id: self.customer_id.clone(),
            }),
        }
    }
}

#[inline]
pub fn format<R: ToDocument + ?Sized>(record: &R) -> Document {
    record.to_document()
}

/// All documents for a load: sales reps first, then customers, each in file order
#[inline]
pub fn documents_from(data: &SalesData) -> Vec<Document> {
    data.sales_reps
        .iter()
        .map(format)
        .chain(data.customers.iter().map(format))
        .collect()
}
