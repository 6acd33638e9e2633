//! Extension based classification of remote files

use serde::Serialize;

use crate::gateway::RemoteEntry;

/// Renderable content kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Text,
    Image,
    Pdf,
}

impl PreviewKind {
    /// Whether the gateway must deliver the payload base64 encoded
    pub fn is_binary(self) -> bool {
        !matches!(self, PreviewKind::Text)
    }
}

/// MIME type used for images whose extension has no entry of its own
pub const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Extension (lowercase) -> kind and MIME type. Anything missing is text.
const PREVIEW_TABLE: &[(&str, PreviewKind, &str)] = &[
    ("pdf", PreviewKind::Pdf, "application/pdf"),
    ("jpg", PreviewKind::Image, "image/jpeg"),
    ("jpeg", PreviewKind::Image, "image/jpeg"),
    ("png", PreviewKind::Image, "image/png"),
    ("gif", PreviewKind::Image, "image/gif"),
    ("webp", PreviewKind::Image, "image/webp"),
    ("bmp", PreviewKind::Image, "image/bmp"),
];

/// Extensions that open in a text editor instead of the preview pane
const EDITOR_EXTENSIONS: &[&str] = &[
    // Text
    "txt", "md", "markdown", "rtf",
    // LaTeX
    "tex", "bib", "cls", "sty",
    // Config
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "env", "properties", "xml", "plist",
    // Web
    "html", "htm", "css", "scss", "sass", "less", "js", "jsx", "ts", "tsx", "mjs", "cjs", "vue",
    "svelte", "astro",
    // Code
    "py", "pyw", "pyx", "rb", "erb", "php", "java", "kt", "kts", "scala", "groovy", "c", "h",
    "cpp", "hpp", "cc", "cxx", "hxx", "cs", "go", "rs", "swift", "m", "mm", "r", "lua", "pl",
    "pm", "sh", "bash", "zsh", "fish", "ps1", "psm1", "bat", "cmd",
    // Data
    "csv", "tsv", "sql", "graphql", "gql",
    // Docs
    "rst", "adoc", "asciidoc", "org",
    // Other
    "log", "diff", "patch", "dockerfile", "makefile", "cmake", "gitignore", "gitattributes",
    "editorconfig",
];

/// Whole file names that count as editor files regardless of extension
const EDITOR_FILE_NAMES: &[&str] = &["dockerfile", "makefile", ".gitignore", ".env"];

/// Lowercased text after the last `.`; the whole name when there is none
pub fn extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or("").to_lowercase()
}

/// Classify a file name into exactly one preview kind
pub fn classify(name: &str) -> PreviewKind {
    lookup(&extension(name))
        .map(|(kind, _)| kind)
        .unwrap_or(PreviewKind::Text)
}

/// MIME type for binary payloads of `name`
pub fn mime_type(name: &str) -> &'static str {
    match lookup(&extension(name)) {
        Some((_, mime)) => mime,
        None => FALLBACK_IMAGE_MIME,
    }
}

fn lookup(ext: &str) -> Option<(PreviewKind, &'static str)> {
    PREVIEW_TABLE
        .iter()
        .find(|(e, _, _)| *e == ext)
        .map(|(_, kind, mime)| (*kind, *mime))
}

/// Whether activating `name` should open it in the configured editor
pub fn is_editor_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    EDITOR_EXTENSIONS.contains(&extension(name).as_str())
        || EDITOR_FILE_NAMES.contains(&lower.as_str())
}

/// What activating (double-clicking) an entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OpenAction {
    Navigate,
    OpenInEditor,
    OpenExternal,
}

impl OpenAction {
    pub fn for_entry(entry: &RemoteEntry) -> Self {
        if entry.is_directory {
            OpenAction::Navigate
        } else if is_editor_file(&entry.name) {
            OpenAction::OpenInEditor
        } else {
            OpenAction::OpenExternal
        }
    }
}
