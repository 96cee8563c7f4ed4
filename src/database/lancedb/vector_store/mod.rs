
use super::{EmbeddedVector, ScoredPayload};
use crate::documents::{DocumentSource, RecordKind};
use crate::{AdvisorError, Result};
use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::{
    Connection, DistanceType, Table,
    query::{ExecutableQuery, QueryBase},
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Vector database store using LanceDB for similarity search.
///
/// Collections map one-to-one onto LanceDB tables and are created on first write.
pub struct VectorStore {
    connection: Connection,
    uri: String,
}

impl VectorStore {
    /// Connect to a LanceDB database
    ///
    /// # Arguments
    /// * `uri` - Local directory or any URI LanceDB understands (`s3://`, `db://`, ...)
    ///
    /// # Returns
    /// * `Result<Self>` - Connected store, or `StoreUnavailable`
    #[inline]
    pub async fn connect(uri: &str) -> Result<Self> {
        debug!("Connecting to LanceDB at {}", uri);

        if !uri.contains("://") {
            std::fs::create_dir_all(Path::new(uri)).map_err(|e| {
                AdvisorError::StoreUnavailable(format!(
                    "Failed to create vector database directory {}: {}",
                    uri, e
                ))
            })?;
        }

        let connection = lancedb::connect(uri).execute().await.map_err(|e| {
            error!("Failed to connect to LanceDB: {}", e);
            AdvisorError::StoreUnavailable(format!("Failed to connect to LanceDB at {}: {}", uri, e))
        })?;

        info!("Vector store connected at {}", uri);
        Ok(Self {
            connection,
            uri: uri.to_string(),
        })
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Names of all collections in the database
    #[inline]
    pub async fn collections(&self) -> Result<Vec<String>> {
        self.connection
            .table_names()
            .execute()
            .await
            .map_err(|e| AdvisorError::StoreUnavailable(format!("Failed to list tables: {}", e)))
    }

    async fn open_collection(&self, collection: &str) -> Result<Option<Table>> {
        if !self.collections().await?.iter().any(|name| name == collection) {
            return Ok(None);
        }

        let table = self
            .connection
            .open_table(collection)
            .execute()
            .await
            .map_err(|e| {
                AdvisorError::StoreUnavailable(format!(
                    "Failed to open collection {}: {}",
                    collection, e
                ))
            })?;

        Ok(Some(table))
    }

    /// Append rows to a collection, creating it when absent.
    ///
    /// Rows are never deduplicated: storing the same text twice yields two rows.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of rows appended
    #[inline]
    pub async fn upsert(&self, collection: &str, records: Vec<EmbeddedVector>) -> Result<usize> {
        let Some(first) = records.first() else {
            debug!("No rows to store in {}", collection);
            return Ok(0);
        };

        let vector_dim = first.vector.len();
        if vector_dim == 0 {
            return Err(AdvisorError::StoreUnavailable(
                "Refusing to store empty vectors".to_string(),
            ));
        }
        if let Some(bad) = records.iter().find(|r| r.vector.len() != vector_dim) {
            return Err(AdvisorError::StoreUnavailable(format!(
                "Inconsistent vector dimensions in batch: {} vs {}",
                vector_dim,
                bad.vector.len()
            )));
        }

        let table = match self.open_collection(collection).await? {
            Some(table) => {
                let existing_dim = Self::detect_vector_dimension(&table).await?;
                if existing_dim != vector_dim {
                    return Err(AdvisorError::StoreUnavailable(format!(
                        "Collection {} stores {}-dimensional vectors but got {} dimensions; was the embedding model changed?",
                        collection, existing_dim, vector_dim
                    )));
                }
                table
            }
            None => self.create_collection(collection, vector_dim).await?,
        };

        debug!("Storing batch of {} rows in {}", records.len(), collection);

        let record_batch = Self::create_record_batch(&records, vector_dim)?;
        let schema = record_batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
        table.add(reader).execute().await.map_err(|e| {
            AdvisorError::StoreUnavailable(format!("Failed to insert into {}: {}", collection, e))
        })?;

        info!("Stored {} rows in collection {}", records.len(), collection);
        Ok(records.len())
    }

    async fn create_collection(&self, collection: &str, vector_dim: usize) -> Result<Table> {
        info!(
            "Creating collection {} with {} dimensions",
            collection, vector_dim
        );

        self.connection
            .create_empty_table(collection, Self::create_schema(vector_dim))
            .execute()
            .await
            .map_err(|e| {
                AdvisorError::StoreUnavailable(format!(
                    "Failed to create collection {}: {}",
                    collection, e
                ))
            })
    }

    /// Detect vector dimension from existing table schema
    async fn detect_vector_dimension(table: &Table) -> Result<usize> {
        let schema = table.schema().await.map_err(|e| {
            AdvisorError::StoreUnavailable(format!("Failed to get table schema: {}", e))
        })?;

        schema
            .fields()
            .iter()
            .find_map(|field| match field.data_type() {
                DataType::FixedSizeList(_, size) if field.name() == "vector" => {
                    usize::try_from(*size).ok()
                }
                _ => None,
            })
            .ok_or_else(|| {
                AdvisorError::StoreUnavailable(
                    "Could not find vector column or determine dimension".to_string(),
                )
            })
    }

    fn create_schema(vector_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    vector_dim as i32,
                ),
                false,
            ),
            Field::new("text", DataType::Utf8, false),
            Field::new("source_kind", DataType::Utf8, true),
            Field::new("source_id", DataType::Utf8, true),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    fn create_record_batch(records: &[EmbeddedVector], vector_dim: usize) -> Result<RecordBatch> {
        let len = records.len();

        let mut ids = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * vector_dim);
        let mut texts = Vec::with_capacity(len);
        let mut source_kinds = Vec::with_capacity(len);
        let mut source_ids = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);

        for record in records {
            ids.push(record.id.as_str());
            flat_values.extend_from_slice(&record.vector);
            texts.push(record.text.as_str());
            source_kinds.push(record.source.as_ref().map(|s| s.kind.as_str()));
            source_ids.push(record.source.as_ref().map(|s| s.record_id.as_str()));
            created_ats.push(record.created_at.as_str());
        }

        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array = FixedSizeListArray::try_new(
            field,
            vector_dim as i32,
            Arc::new(Float32Array::from(flat_values)),
            None,
        )
        .map_err(|e| {
            AdvisorError::StoreUnavailable(format!("Failed to create vector array: {}", e))
        })?;

        let arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(texts)),
            Arc::new(StringArray::from(source_kinds)),
            Arc::new(StringArray::from(source_ids)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(Self::create_schema(vector_dim), arrays).map_err(|e| {
            AdvisorError::StoreUnavailable(format!("Failed to create record batch: {}", e))
        })
    }

    /// Top-`limit` rows by cosine similarity, most similar first.
    ///
    /// A collection that does not exist yet has no hits.
    #[inline]
    pub async fn query(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPayload>> {
        debug!(
            "Searching {} for {} nearest neighbours",
            collection, limit
        );

        let Some(table) = self.open_collection(collection).await? else {
            debug!("Collection {} does not exist; no results", collection);
            return Ok(Vec::new());
        };

        let mut results = table
            .vector_search(query_vector)
            .map_err(|e| {
                AdvisorError::StoreUnavailable(format!("Failed to create vector search: {}", e))
            })?
            .column("vector")
            .distance_type(DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| AdvisorError::StoreUnavailable(format!("Failed to execute search: {}", e)))?;

        let mut hits = Vec::new();
        while let Some(batch) = results.try_next().await.map_err(|e| {
            AdvisorError::StoreUnavailable(format!("Failed to read result stream: {}", e))
        })? {
            hits.extend(Self::parse_search_batch(&batch)?);
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);

        debug!("Found {} hits in {}", hits.len(), collection);
        Ok(hits)
    }

    fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
        batch
            .column_by_name(name)
            .ok_or_else(|| AdvisorError::StoreUnavailable(format!("Missing {} column", name)))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| AdvisorError::StoreUnavailable(format!("Invalid {} column type", name)))
    }

    fn parse_search_batch(batch: &RecordBatch) -> Result<Vec<ScoredPayload>> {
        let texts = Self::string_column(batch, "text")?;
        let source_kinds = Self::string_column(batch, "source_kind")?;
        let source_ids = Self::string_column(batch, "source_id")?;

        let distances = batch
            .column_by_name("_distance")
            .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

        let hits = (0..batch.num_rows())
            .map(|row| {
                let source = if source_kinds.is_null(row) || source_ids.is_null(row) {
                    None
                } else {
                    RecordKind::parse(source_kinds.value(row)).map(|kind| DocumentSource {
                        kind,
                        record_id: source_ids.value(row).to_string(),
                    })
                };

                let distance =
                    distances.map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

                ScoredPayload {
                    text: texts.value(row).to_string(),
                    source,
                    // Cosine distance to similarity
                    score: 1.0 - distance,
                }
            })
            .collect();

        Ok(hits)
    }

    /// Number of rows in a collection; 0 when it does not exist
    #[inline]
    pub async fn count(&self, collection: &str) -> Result<u64> {
        let Some(table) = self.open_collection(collection).await? else {
            return Ok(0);
        };

        let count = table
            .count_rows(None)
            .await
            .map_err(|e| AdvisorError::StoreUnavailable(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }
}
