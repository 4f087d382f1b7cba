//! Tantivy-based search index module.
//!
//! Provides full-text search over published content with field boosting. The index is derived
//! data: it is rebuilt from the content store at startup and on an interval.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tokio::sync::RwLock;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{ContentQuery, ContentRecord, ContentType};

/// Field boost values.
const BOOST_TITLE: f32 = 3.0;
const BOOST_EXCERPT: f32 = 1.5;
const BOOST_CONTENT: f32 = 1.0;

/// Matching item IDs in relevance order, plus the match count before the limit.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    pub ids: Vec<i64>,
    pub total: usize,
}

/// Search index schema fields.
struct SearchFields {
    post_id: Field,
    post_type: Field,
    title: Field,
    excerpt: Field,
    content: Field,
}

impl SearchFields {
    fn schema() -> Schema {
        let mut schema_builder = Schema::builder();
        schema_builder.add_u64_field("post_id", STORED);
        schema_builder.add_text_field("post_type", STRING);
        schema_builder.add_text_field("title", TEXT);
        schema_builder.add_text_field("excerpt", TEXT);
        schema_builder.add_text_field("content", TEXT);
        schema_builder.build()
    }

    /// Resolve fields by name so an index created by another build fails loudly.
    fn resolve(schema: &Schema) -> Result<Self, AppError> {
        Ok(Self {
            post_id: schema.get_field("post_id")?,
            post_type: schema.get_field("post_type")?,
            title: schema.get_field("title")?,
            excerpt: schema.get_field("excerpt")?,
            content: schema.get_field("content")?,
        })
    }
}

/// Tantivy search index for content items.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, SearchFields::schema()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let fields = SearchFields::resolve(&index.schema())?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from content records.
    pub async fn rebuild(&self, records: &[ContentRecord]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Clear existing index
        writer.delete_all_documents()?;

        for record in records {
            writer.add_document(self.create_document(record))?;
        }

        writer.commit()?;

        // Reload reader to see new documents
        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} items", records.len());
        Ok(())
    }

    /// Search items of the given types. Every query term must match.
    pub fn search(
        &self,
        query_str: &str,
        types: &[ContentType],
        limit: usize,
    ) -> Result<SearchHits, AppError> {
        if query_str.trim().is_empty() || types.is_empty() || limit == 0 {
            return Ok(SearchHits::default());
        }

        let searcher = self.reader.searcher();

        let mut query_parser = QueryParser::for_index(
            &self.index,
            vec![self.fields.title, self.fields.excerpt, self.fields.content],
        );
        query_parser.set_conjunction_by_default();
        query_parser.set_field_boost(self.fields.title, BOOST_TITLE);
        query_parser.set_field_boost(self.fields.excerpt, BOOST_EXCERPT);
        query_parser.set_field_boost(self.fields.content, BOOST_CONTENT);

        // Visitor input is free text; parse errors just drop the offending clause.
        let (text_query, errors) = query_parser.parse_query_lenient(query_str);
        if !errors.is_empty() {
            tracing::debug!("Ignored {} malformed search clause(s)", errors.len());
        }

        let type_filter: Vec<(Occur, Box<dyn Query>)> = types
            .iter()
            .map(|kind| {
                let term = Term::from_field_text(self.fields.post_type, kind.as_str());
                let query: Box<dyn Query> =
                    Box::new(TermQuery::new(term, IndexRecordOption::Basic));
                (Occur::Should, query)
            })
            .collect();

        let combined = BooleanQuery::new(vec![
            (Occur::Must, text_query),
            (Occur::Must, Box::new(BooleanQuery::new(type_filter))),
        ]);

        let (top_docs, total) = searcher
            .search(&combined, &(TopDocs::with_limit(limit), Count))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let ids = top_docs
            .into_iter()
            .filter_map(|(_score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let id = doc.get_first(self.fields.post_id)?.as_u64()?;
                i64::try_from(id).ok()
            })
            .collect();

        Ok(SearchHits { ids, total })
    }

    /// Create a Tantivy document from a content record.
    fn create_document(&self, record: &ContentRecord) -> TantivyDocument {
        doc!(
            self.fields.post_id => record.id.max(0) as u64,
            self.fields.post_type => record.kind.as_str().to_string(),
            self.fields.title => record.title.clone(),
            self.fields.excerpt => strip_tags(&record.excerpt),
            self.fields.content => strip_tags(&record.content)
        )
    }
}

/// Reload every searchable item from the store into the index.
pub async fn reindex(repo: &Repository, search: &SearchIndex) -> Result<usize, AppError> {
    let page = repo
        .query_items(&ContentQuery::for_types(&ContentType::SEARCHABLE))
        .await?;
    search.rebuild(&page.records).await?;
    Ok(page.records.len())
}

/// Rebuild the index every `every`, logging failures and retrying on the next tick.
pub async fn reindex_periodically(
    repo: Arc<Repository>,
    search: Arc<SearchIndex>,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately; startup already indexed.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if let Err(e) = reindex(&repo, &search).await {
            tracing::warn!("Periodic reindex failed: {}", e);
        }
    }
}

/// Drop markup so tag names are not indexed as words. A `<` only opens a tag when a letter, `/`
/// or `!` follows it; otherwise it is ordinary text.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' if !in_tag
                && chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_alphabetic() || *next == '/' || *next == '!') =>
            {
                in_tag = true
            }
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text
}
