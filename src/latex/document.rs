/*!
 * Document assembly: orders per-snippet output and wraps it with the LaTeX
 * header and footer.
 *
 * For each snippet the emission order is fixed: quote subsnippets first, the
 * snippet's own content, then comment subsnippets. Only direct children
 * participate in this ordering; deeper nesting is reachable solely through
 * the content walk.
 */

use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::errors::{ExportError, ExportWarning};
use crate::latex::translator::Translator;
use crate::snippet::{LinkType, Snippet};

/// The document preamble, up to and including `\begin{document}`.
///
/// Defines the `quote`, `comment` and `darkblue` colors the tag rules emit
/// references to; `brand` lands in the fancy page header next to the date.
pub fn document_header(brand: &str) -> String {
    let mut header = String::new();
    header.push_str("\\documentclass[11pt, a4paper, abstraction]{scrartcl}\r\n");
    header.push_str("%\\usepackage[T1]{fontenc}\r\n");
    header.push_str("\\usepackage[utf8]{inputenc}\r\n");
    header.push_str("\\usepackage[british]{babel}\r\n");
    header.push_str("\\usepackage{graphicx}\r\n");
    header.push_str("\\usepackage{subcaption}\r\n");
    header.push_str("\\usepackage{verbatim}\r\n");
    header.push_str("\\usepackage{sectsty}\r\n");
    header.push_str("\\usepackage{pdfpages}\r\n");
    header.push_str("\\usepackage{hyperref}\r\n");
    header.push_str("\\usepackage{float}\r\n");
    header.push_str("\\usepackage{fancyhdr}\r\n\r\n");
    header.push_str("\\usepackage{ulem}\r\n\r\n");
    header.push_str("% % Header and footer% %\r\n");
    header.push_str("\\pagestyle{fancy}\r\n");
    header.push_str("\\fancyhf{}\r\n");
    header.push_str("\\fancyhead[LE,RO]{\\leftmark}\r\n");
    header.push_str(&format!("\\fancyhead[RE,LO]{{{} - \\today}}\r\n", brand));
    header.push_str("\\fancyfoot[LE,RO]{\\thepage}\r\n\r\n");
    header.push_str("% % Import math tools % %\r\n");
    header.push_str("\\usepackage{amsfonts}\r\n");
    header.push_str("\\usepackage{amsmath}\r\n");
    header.push_str("\\usepackage{amssymb}\r\n");
    header.push_str("\\usepackage{mathrsfs}\r\n");
    header.push_str("\\usepackage{bm}\r\n");
    header.push_str("\\usepackage{upgreek}\r\n\r\n");
    header.push_str("% % define layout % %\r\n");
    header.push_str("\\usepackage[a4paper]{geometry}\r\n");
    header.push_str(
        "\\newgeometry{inner=2.5cm, outer=2.5cm, bottom=3cm, top=2cm, marginparwidth=1.5cm}\r\n\r\n",
    );
    header.push_str("% % font color % %\r\n");
    header.push_str("\\usepackage{xcolor}\r\n");
    header.push_str("\\definecolor{darkblue}{rgb}{0, 0.2, 0.349}\r\n");
    header.push_str("\\definecolor{comment}{HTML}{F7F2C5}\r\n");
    header.push_str("\\definecolor{quote}{HTML}{ECECEC}\r\n");
    header.push_str("\\usepackage[labelfont={color=darkblue,bf}, format=plain]{caption}\r\n\r\n");
    header.push_str("\\chapterfont{\\color{darkblue}}\r\n");
    header.push_str("\\sectionfont{\\color{darkblue}}\r\n");
    header.push_str("\\subsectionfont{\\color{darkblue}}\r\n\r\n");
    header.push_str("\\usepackage{csquotes}\r\n\r\n");
    header.push_str("% % code snippets %%\r\n");
    header.push_str("\\usepackage{listings}\r\n");
    header.push_str("\\lstset{\r\n  basicstyle=\\ttfamily,\r\n  columns=fullflexible,\r\n  frame=single,\r\n  breaklines=true,\r\n  postbreak=\\mbox{\\textcolor{red}{$\\hookrightarrow$}\\space},\r\n}\r\n");
    header.push_str("\\newcommand{\\mh}[1]{\\large\\textbf{\\textcolor{darkblue}{#1}}}\r\n\r\n\r\n");
    header.push_str("\\setcounter{secnumdepth}{0} \r\n");
    header.push_str("\\setlength\\parindent{0pt} \r\n");
    header.push_str("\\begin{document}");
    header
}

/// The document footer
pub fn document_footer() -> &'static str {
    "\\end{document}"
}

/// Assemble the document and stream it to `path`.
///
/// Returns the full markup text. `on_snippet` is called with the number of
/// top-level snippets finished so far. Warnings from translation accumulate
/// into `warnings`. A failed write is fatal.
pub async fn write_document<F>(
    path: &Path,
    snippets: &[Snippet],
    translator: &Translator,
    brand: &str,
    warnings: &mut Vec<ExportWarning>,
    mut on_snippet: F,
) -> Result<String, ExportError>
where
    F: FnMut(usize),
{
    let mut file = File::create(path)
        .await
        .map_err(|source| ExportError::Stream {
            path: path.to_path_buf(),
            source,
        })?;
    let mut document = String::new();

    emit(&mut file, &mut document, &document_header(brand), path).await?;

    for (index, snippet) in snippets.iter().enumerate() {
        // Quotes precede the snippet's own content
        for sub in snippet.subsnippets_with_link(LinkType::Quote) {
            if sub.textcontent.is_empty() {
                continue;
            }
            let chunk = translator.translate_snippet(sub, warnings).await;
            emit(&mut file, &mut document, &chunk, path).await?;
        }

        if !snippet.textcontent.is_empty() {
            let chunk = translator.translate_snippet(snippet, warnings).await;
            emit(&mut file, &mut document, &chunk, path).await?;
        }

        // Comments follow it
        for sub in snippet.subsnippets_with_link(LinkType::Comment) {
            if sub.textcontent.is_empty() {
                continue;
            }
            let chunk = translator.translate_snippet(sub, warnings).await;
            emit(&mut file, &mut document, &chunk, path).await?;
        }

        on_snippet(index + 1);
    }

    emit(&mut file, &mut document, document_footer(), path).await?;
    file.flush().await.map_err(|source| ExportError::Stream {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(document)
}

/// Write one chunk followed by a line break, mirroring it into the in-memory
/// document text
async fn emit(
    file: &mut File,
    document: &mut String,
    chunk: &str,
    path: &Path,
) -> Result<(), ExportError> {
    document.push_str(chunk);
    document.push_str("\r\n");
    file.write_all(chunk.as_bytes())
        .await
        .map_err(|source| ExportError::Stream {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(b"\r\n")
        .await
        .map_err(|source| ExportError::Stream {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}
