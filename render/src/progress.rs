use cmdtree_core::{MultiProgress, Progress};

/// Renders one progress line: clear to end of line, then
/// `name: message[ extra]`.
pub fn render_progress_line(progress: &Progress) -> String {
    let mut line = format!(
        "\x1b[K{}: {}",
        progress.name,
        progress.message.as_deref().unwrap_or("")
    );
    if let Some(extra) = &progress.extra {
        line.push(' ');
        line.push_str(extra);
    }
    line.push('\n');
    line
}

/// Renders a progress block for in-place redraw.
///
/// When lines were drawn before (`old_count > 0`) the cursor first moves up
/// over them, so each render overwrites the previous one.
///
/// ```
/// use cmdtree_core::{MultiProgress, Progress};
/// use cmdtree_render::render_progress;
///
/// let mut block = MultiProgress::default();
/// let mut copy = Progress::new("copy", 4, 4.0);
/// copy.message = Some("a.txt".into());
/// block.progress.push(copy);
/// assert_eq!(render_progress(&block), "\x1b[Kcopy: a.txt\n");
///
/// block.old_count = 1;
/// assert!(render_progress(&block).starts_with("\x1b[1A\x1b[K"));
/// ```
pub fn render_progress(block: &MultiProgress) -> String {
    let mut out = String::new();
    if block.old_count > 0 {
        out.push_str(&format!("\x1b[{}A", block.old_count));
    }
    for progress in &block.progress {
        out.push_str(&render_progress_line(progress));
    }
    out
}
