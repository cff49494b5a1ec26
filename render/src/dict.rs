use cmdtree_core::Dict;

/// Key column width; longer keys are cut.
pub const KEY_WIDTH: usize = 25;

/// Renders one `key: value` line per entry, in insertion order, followed by
/// a blank line.
///
/// ```
/// use cmdtree_core::Dict;
/// use cmdtree_render::render_dict;
///
/// let mut dict = Dict::new();
/// dict.put("name", "alpha");
/// assert_eq!(render_dict(&dict), format!("{:<26}: alpha\n\n", "name"));
/// ```
pub fn render_dict(dict: &Dict) -> String {
    let mut out = String::new();
    for (key, value) in dict.iter() {
        out.push_str(&format!(
            "{key:<pad$.width$}: {value}\n",
            pad = KEY_WIDTH + 1,
            width = KEY_WIDTH
        ));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_padded_and_cut() {
        let mut dict = Dict::new();
        dict.put("a", "1");
        dict.put("a-very-long-key-name-that-overflows", "2");
        let rendered = render_dict(&dict);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], format!("a{}: 1", " ".repeat(25)));
        assert_eq!(lines[1], "a-very-long-key-name-that : 2");
        assert_eq!(lines[2], "");
    }

    #[test]
    fn test_empty_dict_is_a_blank_line() {
        assert_eq!(render_dict(&Dict::new()), "\n");
    }
}
