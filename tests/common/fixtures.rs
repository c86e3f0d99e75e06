// Test fixtures for integration testing

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Minimal XHTML paper with one formula `var^2`
#[allow(dead_code)] // Used in integration tests
pub fn paper_html(title: &str, author: &str, var: &str) -> String {
    format!(
        "<html><head><title>{title}</title>\
         <meta name=\"citation_author\" content=\"{author}\"></head>\
         <body><h1>{title}</h1><p>We study the square of {var}.</p>\
         <math><semantics><msup><mi>{var}</mi><mn>2</mn></msup>\
         <annotation-xml encoding=\"MathML-Content\">\
         <apply><power/><ci>{var}</ci><cn>2</cn></apply>\
         </annotation-xml></semantics></math></body></html>"
    )
}

/// Synthetic corpus on disk
#[allow(dead_code)] // Used in integration tests
pub struct TestCorpus {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

#[allow(dead_code)] // Used in integration tests
impl TestCorpus {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            files: Vec::new(),
        }
    }

    /// Three HTML papers and one archive holding two more
    ///
    /// ```text
    /// a/one.html
    /// a/two.html
    /// b/bundle.zip  (x.html, y.html)
    /// b/three.html
    /// ```
    pub fn papers() -> Self {
        let mut corpus = Self::new();
        corpus.add_file("a/one.html", &paper_html("One", "Ada", "x"));
        corpus.add_file("a/two.html", &paper_html("Two", "Grace", "y"));
        corpus.add_file("b/three.html", &paper_html("Three", "Emmy", "z"));
        corpus.add_zip(
            "b/bundle.zip",
            &[
                ("x.html", &paper_html("Ex", "Alan", "a")),
                ("y.html", &paper_html("Why", "Kurt", "b")),
            ],
        );
        corpus
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_file(&mut self, rel: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        self.files.push(full_path.clone());
        full_path
    }

    pub fn add_zip(&mut self, rel: &str, entries: &[(&str, &str)]) -> PathBuf {
        let full_path = self.dir.path().join(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut zip = ZipWriter::new(File::create(&full_path).unwrap());
        for (name, content) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        self.files.push(full_path.clone());
        full_path
    }
}
