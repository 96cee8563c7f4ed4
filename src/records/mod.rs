// Record loader
// Reads sales rep and customer rows from CSV files into typed records


use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, info};

use crate::{AdvisorError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRepRecord {
    pub rep_id: String,
    pub customers: u32,
    pub monthly_revenue: f64,
    pub target: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub avg_monthly_sales: f64,
}

/// Everything read by one loader invocation, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesData {
    pub sales_reps: Vec<SalesRepRecord>,
    pub customers: Vec<CustomerRecord>,
}

/// Live data handed to the agent alongside retrieved context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepSnapshot {
    pub sales_rep: SalesRepRecord,
    pub customers: Vec<CustomerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPaths {
    pub sales_reps: PathBuf,
    pub customers: PathBuf,
}

impl SalesData {
    #[inline]
    pub fn find_rep(&self, rep_id: &str) -> Option<&SalesRepRecord> {
        self.sales_reps.iter().find(|rep| rep.rep_id == rep_id)
    }

    /// Build the structured snapshot for a single rep
    ///
    /// # Errors
    /// Returns `AdvisorError::RecordNotFound` if no rep has the given id
    #[inline]
    pub fn snapshot(&self, rep_id: &str) -> Result<RepSnapshot> {
        let rep = self
            .find_rep(rep_id)
            .ok_or_else(|| AdvisorError::RecordNotFound(rep_id.to_string()))?;

        Ok(RepSnapshot {
            sales_rep: rep.clone(),
            customers: self.customers.clone(),
        })
    }
}

/// Load both record files. The first malformed row aborts the whole load.
#[inline]
pub fn load(paths: &RecordPaths) -> Result<SalesData> {
    let sales_reps = read_sales_reps(
        open(&paths.sales_reps)?,
        &paths.sales_reps.display().to_string(),
    )?;
    let customers = read_customers(
        open(&paths.customers)?,
        &paths.customers.display().to_string(),
    )?;

    info!(
        "Loaded {} sales reps and {} customers",
        sales_reps.len(),
        customers.len()
    );

    Ok(SalesData {
        sales_reps,
        customers,
    })
}

fn open(path: &Path) -> Result<File> {
    debug!("Opening record file {}", path.display());
    File::open(path).map_err(|e| {
        AdvisorError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open {}: {}", path.display(), e),
        ))
    })
}

#[inline]
pub fn read_sales_reps<R: Read>(reader: R, source_name: &str) -> Result<Vec<SalesRepRecord>> {
    let mut table = Table::new(reader, source_name)?;
    let rep_id = table.column("rep_id")?;
    let customers = table.column("customers")?;
    let monthly_revenue = table.column("monthly_revenue")?;
    let target = table.column("target")?;
    let conversion_rate = table.column("conversion_rate")?;

    let mut seen = HashSet::new();
    let mut reps = Vec::new();

    while let Some(row) = table.next_row()? {
        let record = SalesRepRecord {
            rep_id: row.identifier(&rep_id)?,
            customers: row.count(&customers)?,
            monthly_revenue: row.amount(&monthly_revenue)?,
            target: row.amount(&target)?,
            conversion_rate: row.rate(&conversion_rate)?,
        };

        if !seen.insert(record.rep_id.clone()) {
            return Err(row.malformed(format!("duplicate rep_id '{}'", record.rep_id)));
        }
        reps.push(record);
    }

    debug!("Read {} sales rep rows from {}", reps.len(), source_name);
    Ok(reps)
}

#[inline]
pub fn read_customers<R: Read>(reader: R, source_name: &str) -> Result<Vec<CustomerRecord>> {
    let mut table = Table::new(reader, source_name)?;
    let customer_id = table.column("customer_id")?;
    let avg_monthly_sales = table.column("avg_monthly_sales")?;

    let mut seen = HashSet::new();
    let mut customers = Vec::new();

    while let Some(row) = table.next_row()? {
        let record = CustomerRecord {
            customer_id: row.identifier(&customer_id)?,
            avg_monthly_sales: row.amount(&avg_monthly_sales)?,
        };

        if !seen.insert(record.customer_id.clone()) {
            return Err(row.malformed(format!(
                "duplicate customer_id '{}'",
                record.customer_id
            )));
        }
        customers.push(record);
    }

    debug!("Read {} customer rows from {}", customers.len(), source_name);
    Ok(customers)
}

struct Table<'a, R: Read> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    source_name: &'a str,
}

struct Column {
    index: usize,
    name: &'static str,
}

struct Row<'a> {
    record: StringRecord,
    line: u64,
    source_name: &'a str,
}

impl<'a, R: Read> Table<'a, R> {
    fn new(reader: R, source_name: &'a str) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| malformed(source_name, 1, e.to_string()))?
            .clone();

        Ok(Self {
            reader,
            headers,
            source_name,
        })
    }

    fn column(&self, name: &'static str) -> Result<Column> {
        self.headers
            .iter()
            .position(|header| header == name)
            .map(|index| Column { index, name })
            .ok_or_else(|| malformed(self.source_name, 1, format!("missing column '{}'", name)))
    }

    fn next_row(&mut self) -> Result<Option<Row<'a>>> {
        let mut record = StringRecord::new();
        let more = self.reader.read_record(&mut record).map_err(|e| {
            let line = e.position().map_or(0, csv::Position::line);
            malformed(self.source_name, line, e.to_string())
        })?;

        if !more {
            return Ok(None);
        }

        let line = record.position().map_or(0, csv::Position::line);
        Ok(Some(Row {
            record,
            line,
            source_name: self.source_name,
        }))
    }
}

impl Row<'_> {
    fn raw(&self, column: &Column) -> Result<&str> {
        match self.record.get(column.index) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(self.malformed(format!("missing value for '{}'", column.name))),
        }
    }

    fn identifier(&self, column: &Column) -> Result<String> {
        self.raw(column).map(str::to_string)
    }

    fn count(&self, column: &Column) -> Result<u32> {
        let value = self.raw(column)?;
        value.parse().map_err(|_| {
            self.malformed(format!(
                "'{}' is not a non-negative integer: {}",
                column.name, value
            ))
        })
    }

    fn amount(&self, column: &Column) -> Result<f64> {
        let value = self.raw(column)?;
        match value.parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
            _ => Err(self.malformed(format!(
                "'{}' is not a non-negative decimal: {}",
                column.name, value
            ))),
        }
    }

    fn rate(&self, column: &Column) -> Result<f64> {
        let rate = self.amount(column)?;
        if rate > 1.0 {
            return Err(self.malformed(format!(
                "'{}' must be between 0 and 1: {}",
                column.name, rate
            )));
        }
        Ok(rate)
    }

    fn malformed(&self, reason: String) -> AdvisorError {
        malformed(self.source_name, self.line, reason)
    }
}

fn malformed(source_name: &str, row: u64, reason: String) -> AdvisorError {
    AdvisorError::MalformedRecord {
        source_name: source_name.to_string(),
        row,
        reason,
    }
}
