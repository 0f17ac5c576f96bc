//! Multi-document manifest patching.
//!
//! A manifest file is split on `---` separator lines, each document is parsed
//! into an ordered mapping, a fixed set of well-known fields is overwritten,
//! and the documents are serialized and joined back in their original order.
//!
//! Patching is best-effort: a document without a `metadata` or `spec` mapping
//! is left alone rather than rejected. Parsing is not: one malformed document
//! aborts the whole file before anything is written.

use crate::error::{KubeAiError, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

pub const DOCUMENT_SEPARATOR: &str = "---";

// ---------------------------------------------------------------------------
// Splitter / joiner
// ---------------------------------------------------------------------------

/// Split multi-document YAML text on `---` separator lines. A separator may
/// carry a trailing `# comment`.
///
/// Each segment is trimmed; empty segments (leading, trailing or repeated
/// separators) are dropped. Text without a separator yields one document.
pub fn split_documents(content: &str) -> Vec<String> {
    let mut docs = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if is_separator(line) {
            push_segment(&mut docs, &current);
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_segment(&mut docs, &current);
    docs
}

fn is_separator(line: &str) -> bool {
    let Some(rest) = line.trim_end().strip_prefix(DOCUMENT_SEPARATOR) else {
        return false;
    };
    rest.is_empty() || (rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with('#'))
}

fn push_segment(docs: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        docs.push(trimmed.to_string());
    }
}

/// Join serialized documents with a separator line.
pub fn join_documents(docs: &[String]) -> String {
    let mut out = String::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            out.push_str(DOCUMENT_SEPARATOR);
            out.push('\n');
        }
        out.push_str(doc);
        if !doc.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Caller-supplied replacements for `metadata.namespace`, `metadata.name`
/// and `spec.replicas`.
///
/// Empty strings and a replica count of zero mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    namespace: Option<String>,
    name: Option<String>,
    replicas: Option<u32>,
}

impl Overrides {
    pub fn new(namespace: Option<String>, name: Option<String>, replicas: Option<u32>) -> Self {
        Self {
            namespace: namespace.filter(|s| !s.is_empty()),
            name: name.filter(|s| !s.is_empty()),
            replicas: replicas.filter(|r| *r > 0),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = Some(replicas).filter(|r| *r > 0);
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn replicas(&self) -> Option<u32> {
        self.replicas
    }

    pub fn is_empty(&self) -> bool {
        self.namespace.is_none() && self.name.is_none() && self.replicas.is_none()
    }
}

/// Which fields a patch actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Patched {
    pub namespace: bool,
    pub name: bool,
    pub replicas: bool,
}

impl Patched {
    pub fn any(&self) -> bool {
        self.namespace || self.name || self.replicas
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// One parsed YAML document. Key order is preserved through a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest(Mapping);

impl Manifest {
    pub fn from_mapping(mapping: Mapping) -> Self {
        Self(mapping)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata().and_then(|m| m.get("name")).and_then(Value::as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
    }

    pub fn replicas(&self) -> Option<u64> {
        self.0
            .get("spec")
            .and_then(Value::as_mapping)
            .and_then(|m| m.get("replicas"))
            .and_then(Value::as_u64)
    }

    fn metadata(&self) -> Option<&Mapping> {
        self.0.get("metadata").and_then(Value::as_mapping)
    }

    fn metadata_mut(&mut self) -> Option<&mut Mapping> {
        self.0.get_mut("metadata").and_then(Value::as_mapping_mut)
    }

    fn spec_mut(&mut self) -> Option<&mut Mapping> {
        self.0.get_mut("spec").and_then(Value::as_mapping_mut)
    }

    /// Apply `overrides` in place: namespace, then name, then replicas.
    ///
    /// Missing or non-mapping `metadata`/`spec` sections are skipped; they are
    /// never created.
    pub fn apply(&mut self, overrides: &Overrides) -> Patched {
        let mut patched = Patched::default();

        if let Some(meta) = self.metadata_mut() {
            if let Some(ns) = overrides.namespace() {
                meta.insert(Value::from("namespace"), Value::from(ns));
                patched.namespace = true;
            }
            if let Some(name) = overrides.name() {
                meta.insert(Value::from("name"), Value::from(name));
                patched.name = true;
            }
        }

        if let Some(spec) = self.spec_mut() {
            if let Some(replicas) = overrides.replicas() {
                spec.insert(Value::from("replicas"), Value::from(replicas));
                patched.replicas = true;
            }
        }

        patched
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ManifestSet
// ---------------------------------------------------------------------------

/// The ordered documents of one manifest file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestSet {
    documents: Vec<Manifest>,
}

impl ManifestSet {
    /// Split and parse every document. The first failure aborts the parse.
    ///
    /// Documents that parse to null (comments only) are dropped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut documents = Vec::new();
        for (i, text) in split_documents(content).iter().enumerate() {
            let index = i + 1;
            let value: Value = serde_yaml::from_str(text)
                .map_err(|source| KubeAiError::ManifestParse { index, source })?;
            match value {
                Value::Mapping(mapping) => documents.push(Manifest(mapping)),
                Value::Null => {
                    tracing::debug!(index, "skipping empty YAML document");
                }
                _ => return Err(KubeAiError::NotAMapping { index }),
            }
        }
        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[Manifest] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn apply(&mut self, overrides: &Overrides) -> Vec<Patched> {
        self.documents
            .iter_mut()
            .map(|doc| doc.apply(overrides))
            .collect()
    }

    /// Serialize all documents and join them with separator lines.
    pub fn to_yaml(&self) -> Result<String> {
        let mut out = Vec::with_capacity(self.documents.len());
        for (i, doc) in self.documents.iter().enumerate() {
            let text = doc
                .to_yaml()
                .map_err(|source| KubeAiError::ManifestSerialize {
                    index: i + 1,
                    source,
                })?;
            out.push(text);
        }
        Ok(join_documents(&out))
    }
}

// ---------------------------------------------------------------------------
// modify_file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ModifyReport {
    pub path: PathBuf,
    pub documents: usize,
    pub patched: Vec<Patched>,
}

impl ModifyReport {
    pub fn changed(&self) -> usize {
        self.patched.iter().filter(|p| p.any()).count()
    }
}

/// Read `path`, patch every document with `overrides`, and overwrite `path`.
///
/// The file is only written after every document has been parsed and
/// serialized. A file with no documents is rejected and left as it is.
pub fn modify_file(path: &Path, overrides: &Overrides) -> Result<ModifyReport> {
    let content = crate::io::read_text(path)?;
    let mut set = ManifestSet::parse(&content)?;
    if set.is_empty() {
        return Err(KubeAiError::EmptyManifest(path.to_path_buf()));
    }
    let patched = set.apply(overrides);
    let output = set.to_yaml()?;

    crate::io::atomic_write(path, output.as_bytes())?;

    let report = ModifyReport {
        path: path.to_path_buf(),
        documents: set.len(),
        patched,
    };
    tracing::info!(
        path = %path.display(),
        documents = report.documents,
        changed = report.changed(),
        "manifest updated"
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEPLOYMENT: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: default
  labels:
    app: web
spec:
  replicas: 2
  selector:
    matchLabels:
      app: web
";

    const SERVICE: &str = "\
apiVersion: v1
kind: Service
metadata:
  name: web-svc
spec:
  ports:
    - port: 80
";

    fn two_docs() -> String {
        format!("{DEPLOYMENT}---\n{SERVICE}")
    }

    fn reparse(text: &str) -> Vec<Value> {
        split_documents(text)
            .iter()
            .map(|d| serde_yaml::from_str(d).unwrap())
            .collect()
    }

    // -- splitter ----------------------------------------------------------

    #[test]
    fn split_single_document() {
        let docs = split_documents(DEPLOYMENT);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].starts_with("apiVersion: apps/v1"));
    }

    #[test]
    fn split_discards_empty_segments() {
        let text = format!("---\n\n---\n{DEPLOYMENT}---\n---\n{SERVICE}\n---\n");
        let docs = split_documents(&text);
        assert_eq!(docs.len(), 2);
        assert!(docs[0].contains("kind: Deployment"));
        assert!(docs[1].contains("kind: Service"));
    }

    #[test]
    fn split_ignores_dashes_inside_a_line() {
        let text = "metadata:\n  annotations:\n    note: \"a---b\"\n";
        assert_eq!(split_documents(text).len(), 1);
    }

    #[test]
    fn split_accepts_trailing_whitespace_on_separator() {
        let text = "a: 1\n---   \nb: 2\n";
        assert_eq!(split_documents(text), vec!["a: 1", "b: 2"]);
    }

    #[test]
    fn split_accepts_separator_with_comment() {
        let text = "a: 1\n--- # service\nb: 2\n---\t#x\nc: 3\n";
        assert_eq!(split_documents(text), vec!["a: 1", "b: 2", "c: 3"]);
        assert_eq!(split_documents("a: 1\n---#tight\nb: 2\n").len(), 1);
    }

    #[test]
    fn split_empty_input() {
        assert!(split_documents("").is_empty());
        assert!(split_documents("  \n---\n\n").is_empty());
    }

    #[test]
    fn join_inserts_separator_lines() {
        let joined = join_documents(&["a: 1".to_string(), "b: 2\n".to_string()]);
        assert_eq!(joined, "a: 1\n---\nb: 2\n");
    }

    // -- overrides ---------------------------------------------------------

    #[test]
    fn zero_replicas_and_empty_strings_are_unset() {
        let o = Overrides::new(Some(String::new()), Some(String::new()), Some(0));
        assert!(o.is_empty());
        let o = Overrides::default().with_replicas(0).with_name("");
        assert!(o.is_empty());
    }

    // -- patcher -----------------------------------------------------------

    #[test]
    fn no_overrides_is_a_noop() {
        let mut set = ManifestSet::parse(DEPLOYMENT).unwrap();
        let before = set.clone();
        let patched = set.apply(&Overrides::default());
        assert!(!patched[0].any());
        assert_eq!(set, before);

        let out = set.to_yaml().unwrap();
        let original: Value = serde_yaml::from_str(DEPLOYMENT).unwrap();
        assert_eq!(reparse(&out), vec![original]);
    }

    #[test]
    fn name_override_applies_to_every_document() {
        let mut set = ManifestSet::parse(&two_docs()).unwrap();
        set.apply(&Overrides::default().with_name("renamed"));
        for doc in set.documents() {
            assert_eq!(doc.name(), Some("renamed"));
        }
    }

    #[test]
    fn namespace_override_adds_key_to_existing_metadata() {
        let mut set = ManifestSet::parse(SERVICE).unwrap();
        assert_eq!(set.documents()[0].namespace(), None);
        set.apply(&Overrides::default().with_namespace("prod"));
        assert_eq!(set.documents()[0].namespace(), Some("prod"));
    }

    #[test]
    fn replica_override_only_touches_spec_mappings() {
        let mut set = ManifestSet::parse(&two_docs()).unwrap();
        let patched = set.apply(&Overrides::default().with_replicas(5));
        assert_eq!(set.documents()[0].replicas(), Some(5));
        // The Service has a spec mapping, so replicas is written there too.
        assert_eq!(set.documents()[1].replicas(), Some(5));
        assert!(patched.iter().all(|p| p.replicas));
    }

    #[test]
    fn zero_replicas_leaves_value_unchanged() {
        let mut set = ManifestSet::parse(DEPLOYMENT).unwrap();
        set.apply(&Overrides::new(None, None, Some(0)));
        assert_eq!(set.documents()[0].replicas(), Some(2));
    }

    #[test]
    fn missing_metadata_is_skipped_without_error() {
        let text = "apiVersion: v1\nkind: List\nitems: []\n";
        let mut set = ManifestSet::parse(text).unwrap();
        let before = set.clone();
        let patched = set.apply(&Overrides::default().with_namespace("prod").with_replicas(3));
        assert!(!patched[0].any());
        assert_eq!(set, before);
    }

    #[test]
    fn non_mapping_metadata_and_spec_are_skipped() {
        let text = "kind: Odd\nmetadata: just-a-string\nspec:\n  - 1\n  - 2\n";
        let mut set = ManifestSet::parse(text).unwrap();
        let before = set.clone();
        set.apply(&Overrides::default().with_name("x").with_replicas(4));
        assert_eq!(set, before);
    }

    #[test]
    fn patch_preserves_key_order() {
        let mut set = ManifestSet::parse(DEPLOYMENT).unwrap();
        set.apply(&Overrides::default().with_name("api").with_namespace("prod"));
        let keys: Vec<&str> = set.documents()[0]
            .as_mapping()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, ["apiVersion", "kind", "metadata", "spec"]);

        let out = set.to_yaml().unwrap();
        let name_pos = out.find("name: api").unwrap();
        let ns_pos = out.find("namespace: prod").unwrap();
        assert!(name_pos < ns_pos, "existing key positions are kept:\n{out}");
    }

    // -- round trip --------------------------------------------------------

    #[test]
    fn two_documents_round_trip_in_order() {
        let set = ManifestSet::parse(&two_docs()).unwrap();
        let out = set.to_yaml().unwrap();
        let docs = reparse(&out);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["kind"].as_str(), Some("Deployment"));
        assert_eq!(docs[1]["kind"].as_str(), Some("Service"));
    }

    #[test]
    fn comment_only_document_is_dropped() {
        let text = format!("# leading comment\n---\n{SERVICE}");
        let set = ManifestSet::parse(&text).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.documents()[0].kind(), Some("Service"));
    }

    #[test]
    fn malformed_document_reports_its_index() {
        let text = format!("{DEPLOYMENT}---\nmetadata: [unclosed\n");
        let err = ManifestSet::parse(&text).unwrap_err();
        assert!(matches!(err, KubeAiError::ManifestParse { index: 2, .. }));
    }

    #[test]
    fn sequence_document_is_rejected() {
        let err = ManifestSet::parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, KubeAiError::NotAMapping { index: 1 }));
    }

    // -- modify_file -------------------------------------------------------

    #[test]
    fn modify_file_overwrites_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, two_docs()).unwrap();

        let overrides = Overrides::new(Some("staging".into()), Some("api".into()), Some(3));
        let report = modify_file(&path, &overrides).unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(report.changed(), 2);

        let written = std::fs::read_to_string(&path).unwrap();
        let set = ManifestSet::parse(&written).unwrap();
        let deploy = &set.documents()[0];
        assert_eq!(deploy.name(), Some("api"));
        assert_eq!(deploy.namespace(), Some("staging"));
        assert_eq!(deploy.replicas(), Some(3));
    }

    #[test]
    fn modify_file_leaves_file_untouched_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        let original = format!("{DEPLOYMENT}---\nspec: {{ replicas: \n");
        std::fs::write(&path, &original).unwrap();

        let overrides = Overrides::default().with_name("api");
        assert!(modify_file(&path, &overrides).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn modify_file_rejects_comment_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.yaml");
        let original = "# nothing here yet\n---\n# still nothing\n";
        std::fs::write(&path, original).unwrap();

        let err = modify_file(&path, &Overrides::default().with_name("api")).unwrap_err();
        assert!(matches!(err, KubeAiError::EmptyManifest(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn modify_file_accepts_commented_separator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, format!("{DEPLOYMENT}--- # service\n{SERVICE}")).unwrap();

        let report = modify_file(&path, &Overrides::default().with_namespace("prod")).unwrap();
        assert_eq!(report.documents, 2);
    }

    #[cfg(unix)]
    #[test]
    fn modify_file_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, DEPLOYMENT).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        modify_file(&path, &Overrides::default().with_name("api")).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn modify_file_through_symlink_updates_target() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.yaml");
        let link = dir.path().join("link.yaml");
        std::fs::write(&real, DEPLOYMENT).unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        modify_file(&link, &Overrides::default().with_name("api")).unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let set = ManifestSet::parse(&std::fs::read_to_string(&real).unwrap()).unwrap();
        assert_eq!(set.documents()[0].name(), Some("api"));
    }

    #[test]
    fn modify_file_missing_path() {
        let dir = TempDir::new().unwrap();
        let err = modify_file(&dir.path().join("absent.yaml"), &Overrides::default()).unwrap_err();
        assert!(matches!(err, KubeAiError::FileNotFound(_)));
    }
}
