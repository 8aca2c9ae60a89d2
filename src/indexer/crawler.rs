//! Recursive corpus crawl and id assignment
//!
//! The crawler walks a directory tree depth-first: eligible files in the
//! current directory are indexed first, then each subdirectory in turn.
//! Word and document ids come from process-local counters seeded empty at
//! the start of a run, so a run against a non-empty schema produces
//! colliding ids - the expected workflow is reset-then-reindex.
//!
//! Failure policy: a file that cannot be read is logged, counted, and
//! skipped; traversal continues with its siblings. A storage failure
//! aborts the whole run.

use crate::error::Result;
use crate::indexer::tokenize::extract_words;
use crate::store::StorageGateway;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of one indexing run
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Documents persisted
    pub documents: u64,

    /// Distinct new words persisted
    pub words: u64,

    /// Occurrence edges persisted
    pub occurrences: u64,

    /// Bytes of file content tokenized
    pub bytes: u64,

    /// Files skipped because they could not be read
    pub errors: u64,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// False if the run was interrupted before finishing
    pub completed: bool,
}

/// Live progress snapshot for display
#[derive(Debug, Clone, Default)]
pub struct CrawlProgress {
    pub documents: u64,
    pub words: u64,
    pub occurrences: u64,
    pub bytes: u64,
    pub errors: u64,
    pub elapsed: Duration,
}

impl CrawlProgress {
    pub fn docs_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.documents as f64 / secs
        } else {
            0.0
        }
    }
}

/// Directory-tree indexer
///
/// Owns the run-local `words` and `documents` dictionaries exclusively; a
/// second concurrent run over the same shards is unsupported.
pub struct Crawler {
    /// Eligible file extensions, with leading dot (".txt")
    extensions: Vec<String>,

    /// Paths matching any of these are skipped entirely
    exclude: Vec<Regex>,

    /// Set externally (signal handler) to stop between files
    shutdown: Arc<AtomicBool>,

    words: HashMap<String, i32>,
    documents: HashMap<PathBuf, i32>,

    documents_count: u64,
    words_count: u64,
    occurrences_count: u64,
    bytes_count: u64,
    errors_count: u64,
}

impl Crawler {
    /// Create a crawler for the given file extensions and exclude patterns
    pub fn new(extensions: Vec<String>, exclude: Vec<Regex>) -> Self {
        Self {
            extensions,
            exclude,
            shutdown: Arc::new(AtomicBool::new(false)),
            words: HashMap::new(),
            documents: HashMap::new(),
            documents_count: 0,
            words_count: 0,
            occurrences_count: 0,
            bytes_count: 0,
            errors_count: 0,
        }
    }

    /// Flag that stops the crawl between files when set
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Index every eligible file under `root`
    pub fn index_tree(&mut self, gateway: &mut StorageGateway, root: &Path) -> Result<IndexStats> {
        self.index_tree_with_progress(gateway, root, |_| {})
    }

    /// Index every eligible file under `root`, reporting progress per file
    pub fn index_tree_with_progress<F>(
        &mut self,
        gateway: &mut StorageGateway,
        root: &Path,
        mut progress: F,
    ) -> Result<IndexStats>
    where
        F: FnMut(CrawlProgress),
    {
        let start = Instant::now();
        self.index_dir(gateway, root, start, &mut progress)?;

        let completed = !self.shutdown.load(Ordering::Relaxed);
        let stats = IndexStats {
            documents: self.documents_count,
            words: self.words_count,
            occurrences: self.occurrences_count,
            bytes: self.bytes_count,
            errors: self.errors_count,
            duration: start.elapsed(),
            completed,
        };

        info!(
            documents = stats.documents,
            words = stats.words,
            occurrences = stats.occurrences,
            "Indexing run finished"
        );
        Ok(stats)
    }

    /// Process `dir`'s eligible files, then recurse into its subdirectories
    fn index_dir<F>(
        &mut self,
        gateway: &mut StorageGateway,
        dir: &Path,
        start: Instant,
        progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(CrawlProgress),
    {
        debug!("Crawling {}", dir.display());

        // Sorted traversal keeps id assignment deterministic for a given
        // corpus layout regardless of readdir order.
        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if self.is_excluded(&path) {
                continue;
            }
            if path.is_dir() {
                subdirs.push(path);
            } else if self.is_eligible(&path) {
                files.push(path);
            }
        }
        files.sort();
        subdirs.sort();

        for file in files {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(());
            }
            self.index_file(gateway, &file)?;
            progress(self.progress(start.elapsed()));
        }

        for subdir in subdirs {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(());
            }
            self.index_dir(gateway, &subdir, start, progress)?;
        }

        Ok(())
    }

    /// Index one file: document row, new word rows, occurrence rows
    fn index_file(&mut self, gateway: &mut StorageGateway, path: &Path) -> Result<()> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                self.errors_count += 1;
                return Ok(());
            }
        };

        let doc_id = (self.documents.len() + 1) as i32;
        self.documents.insert(path.to_path_buf(), doc_id);
        gateway.insert_document(doc_id, &path.display().to_string())?;

        let tokens = extract_words(&content);

        // New tokens get ids in encounter order; known tokens are not re-sent
        let mut new_words = HashMap::new();
        for token in &tokens {
            if self.words.contains_key(token) {
                continue;
            }
            let id = (self.words.len() + 1) as i32;
            self.words.insert(token.clone(), id);
            new_words.insert(token.clone(), id);
        }
        gateway.insert_words(&new_words)?;

        let word_ids: HashSet<i32> = tokens.iter().map(|token| self.words[token]).collect();
        gateway.insert_occurrences(doc_id, &word_ids)?;

        self.documents_count += 1;
        self.words_count += new_words.len() as u64;
        self.occurrences_count += word_ids.len() as u64;
        self.bytes_count += content.len() as u64;
        Ok(())
    }

    fn progress(&self, elapsed: Duration) -> CrawlProgress {
        CrawlProgress {
            documents: self.documents_count,
            words: self.words_count,
            occurrences: self.occurrences_count,
            bytes: self.bytes_count,
            errors: self.errors_count,
            elapsed,
        }
    }

    fn is_eligible(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let dotted = format!(".{}", ext);
        self.extensions.iter().any(|allowed| *allowed == dotted)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let text = path.display().to_string();
        self.exclude.iter().any(|re| re.is_match(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::ShardCatalog;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn fresh_gateway(dir: &Path) -> StorageGateway {
        let mut gateway = StorageGateway::new(ShardCatalog::new(dir));
        gateway.recreate_schema().unwrap();
        gateway
    }

    #[test]
    fn test_duplicate_tokens_yield_one_occurrence() {
        let shards = tempdir().unwrap();
        let corpus = tempdir().unwrap();
        write_file(corpus.path(), "a.txt", "cat dog cat");

        let mut gateway = fresh_gateway(shards.path());
        let mut crawler = Crawler::new(vec![".txt".into()], vec![]);
        let stats = crawler.index_tree(&mut gateway, corpus.path()).unwrap();

        assert_eq!(stats.documents, 1);
        assert_eq!(stats.words, 2);
        assert_eq!(stats.occurrences, 2);
        assert!(stats.completed);

        let words = gateway.all_words().unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words["cat"], 1);
        assert_eq!(words["dog"], 2);
    }

    #[test]
    fn test_extension_filter() {
        let shards = tempdir().unwrap();
        let corpus = tempdir().unwrap();
        write_file(corpus.path(), "a.txt", "indexed");
        write_file(corpus.path(), "b.log", "ignored");
        write_file(corpus.path(), "noext", "ignored");

        let mut gateway = fresh_gateway(shards.path());
        let mut crawler = Crawler::new(vec![".txt".into()], vec![]);
        let stats = crawler.index_tree(&mut gateway, corpus.path()).unwrap();

        assert_eq!(stats.documents, 1);
        let words = gateway.all_words().unwrap();
        assert!(words.contains_key("indexed"));
        assert!(!words.contains_key("ignored"));
    }

    #[test]
    fn test_ids_assigned_across_files_in_order() {
        let shards = tempdir().unwrap();
        let corpus = tempdir().unwrap();
        // Sorted traversal: a.txt before b.txt
        write_file(corpus.path(), "a.txt", "hello world");
        write_file(corpus.path(), "b.txt", "hello there");

        let mut gateway = fresh_gateway(shards.path());
        let mut crawler = Crawler::new(vec![".txt".into()], vec![]);
        crawler.index_tree(&mut gateway, corpus.path()).unwrap();

        let words = gateway.all_words().unwrap();
        assert_eq!(words["hello"], 1);
        assert_eq!(words["world"], 2);
        assert_eq!(words["there"], 3);
    }

    #[test]
    fn test_subdirectories_after_files() {
        let shards = tempdir().unwrap();
        let corpus = tempdir().unwrap();
        std::fs::create_dir(corpus.path().join("sub")).unwrap();
        write_file(&corpus.path().join("sub"), "inner.txt", "inner");
        write_file(corpus.path(), "outer.txt", "outer");

        let mut gateway = fresh_gateway(shards.path());
        let mut crawler = Crawler::new(vec![".txt".into()], vec![]);
        let stats = crawler.index_tree(&mut gateway, corpus.path()).unwrap();

        assert_eq!(stats.documents, 2);
        // Current directory's files index before any subdirectory's
        let locations = gateway.document_locations(&[1, 2]).unwrap();
        let by_id: HashMap<i32, String> = locations.into_iter().collect();
        assert!(by_id[&1].ends_with("outer.txt"));
        assert!(by_id[&2].ends_with("inner.txt"));
    }

    #[test]
    fn test_exclude_pattern_prunes_subtree() {
        let shards = tempdir().unwrap();
        let corpus = tempdir().unwrap();
        std::fs::create_dir(corpus.path().join("skipme")).unwrap();
        write_file(&corpus.path().join("skipme"), "hidden.txt", "hidden");
        write_file(corpus.path(), "kept.txt", "kept");

        let mut gateway = fresh_gateway(shards.path());
        let mut crawler = Crawler::new(
            vec![".txt".into()],
            vec![Regex::new("skipme").unwrap()],
        );
        let stats = crawler.index_tree(&mut gateway, corpus.path()).unwrap();

        assert_eq!(stats.documents, 1);
        assert!(!gateway.all_words().unwrap().contains_key("hidden"));
    }

    #[test]
    fn test_shutdown_flag_stops_run() {
        let shards = tempdir().unwrap();
        let corpus = tempdir().unwrap();
        write_file(corpus.path(), "a.txt", "alpha");

        let mut gateway = fresh_gateway(shards.path());
        let mut crawler = Crawler::new(vec![".txt".into()], vec![]);
        crawler.shutdown_flag().store(true, Ordering::SeqCst);
        let stats = crawler.index_tree(&mut gateway, corpus.path()).unwrap();

        assert_eq!(stats.documents, 0);
        assert!(!stats.completed);
    }
}
