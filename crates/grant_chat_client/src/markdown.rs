//! Final markdown pass over a complete reply.
//!
//! A keyword heuristic tuned for grant-proposal answers: bullet markers become
//! `* ` items, short lines naming a proposal section become `## ` headings and,
//! inside a section, short lines naming a subsection become `### ` headings.
//! It is cosmetic; lines mixing several topics may be misclassified.

const SECTION_KEYWORDS: &[&str] = &["excellence", "impact", "implementation"];

const SUBSECTION_KEYWORDS: &[&str] = &[
    "objectives",
    "ambition",
    "state-of-the-art",
    "methodology",
    "trl level",
    "impact pathway",
    "dissemination",
    "communication",
    "work plan",
];

/// Section headings must be shorter than this many characters.
pub const SECTION_MAX_CHARS: usize = 50;
/// Subsection headings must be shorter than this many characters.
pub const SUBSECTION_MAX_CHARS: usize = 60;

/// How a single line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Section,
    Subsection,
    Plain,
}

/// Classify `line`. Subsections are only recognised once a section is open.
pub fn classify(line: &str, in_section: bool) -> LineKind {
    let lower = line.to_lowercase();
    let len = line.chars().count();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if mentions(SECTION_KEYWORDS) && len < SECTION_MAX_CHARS {
        LineKind::Section
    } else if in_section && mentions(SUBSECTION_KEYWORDS) && len < SUBSECTION_MAX_CHARS {
        LineKind::Subsection
    } else {
        LineKind::Plain
    }
}

/// Reformat a complete reply as markdown.
pub fn format_response(text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    // Order matters: " - " first so the surrounding space is consumed.
    let bulleted = normalized.replace(" - ", "\n* ").replace("- ", "\n* ");

    let (lines, _section) = bulleted
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(
            (Vec::new(), None::<&str>),
            |(mut lines, section), line| {
                let section = match classify(line, section.is_some()) {
                    LineKind::Section => {
                        lines.push(format!("## {line}"));
                        Some(line)
                    }
                    LineKind::Subsection => {
                        lines.push(format!("### {line}"));
                        section
                    }
                    LineKind::Plain => {
                        lines.push(line.to_string());
                        section
                    }
                };
                (lines, section)
            },
        );

    ensure_bullet_spacing(&lines.join("\n\n"))
}

/// Make sure every `* ` line follows a blank line, inserting one only where
/// it is missing. Text joined by [`format_response`] already satisfies this.
pub fn ensure_bullet_spacing(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_blank = true;
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.starts_with("* ") && !after_blank {
            out.push('\n');
        }
        out.push_str(line);
        after_blank = line.trim().is_empty();
    }
    out
}
