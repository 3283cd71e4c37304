use anyhow::Result;

/// A sample document shown in the Documents tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocEntry {
    pub name: &'static str,
    pub path: &'static str,
}

/// Presentation deck shown by the Slides tab.
pub const DECK_PATH: &str = "assets/docchat-overview.pdf";

pub const OVERVIEW_TEXT: &str = "This deck covers the architecture, implementation, and deployment \
of the document Q&A assistant. It walks through frontend-backend integration, the retrieval \
pipeline, and the CI/CD workflow.";

/// Project documents offered for upload into the assistant.
pub const SAMPLE_DOCUMENTS: &[DocEntry] = &[
    DocEntry {
        name: "Assistant_Architecture.pdf",
        path: "assets/Assistant_Architecture.pdf",
    },
    DocEntry {
        name: "Retrieval_Integration_Guide.pdf",
        path: "assets/Retrieval_Integration_Guide.pdf",
    },
    DocEntry {
        name: "Employee_FAQ_List.docx",
        path: "assets/Employee_FAQ_List.docx",
    },
];

/// Open a document with the system handler, detached from the TUI.
pub fn open_external(path: &str) -> Result<()> {
    open::that_detached(path)?;
    Ok(())
}

/// Copy a document path to the system clipboard so it can be pasted into
/// other programs. Tries the usual clipboard utilities in order.
pub fn copy_path_to_clipboard(path: &str) {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let candidates: &[(&str, &[&str])] = &[
        ("pbcopy", &[]),
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
    ];

    for (program, args) in candidates {
        if let Ok(mut child) = Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .spawn()
        {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(path.as_bytes());
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_documents_have_distinct_names() {
        let mut names: Vec<&str> = SAMPLE_DOCUMENTS.iter().map(|d| d.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SAMPLE_DOCUMENTS.len());
    }

    #[test]
    fn entry_paths_end_with_their_file_names() {
        for doc in SAMPLE_DOCUMENTS {
            assert!(doc.path.ends_with(doc.name), "{} vs {}", doc.path, doc.name);
        }
    }
}
