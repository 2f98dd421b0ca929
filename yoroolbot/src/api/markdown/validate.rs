/// Checks a MarkdownV2 template for reserved characters that are neither escaped nor markup.
///
/// Intended for const contexts: the `markdown_string!` and `markdown_format!` macros call it in a
/// `const _: () = ...` item so that a broken template fails the build instead of being rejected
/// by Telegram at runtime. `{}` pairs are accepted as `markdown_format!` placeholders.
///
/// Markup characters (`*`, `_`, `~`, `` ` ``, `[`, `]`) are accepted as is. `(` is only accepted
/// right after `]` (link target) and `)` only closes such a link target.
pub const fn validate_markdownv2_format(s: &str) {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut in_link_target = false;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\\' => {
                if i + 1 >= bytes.len() {
                    panic!("MarkdownV2 template ends with a dangling backslash");
                }
                i += 2;
                continue;
            }
            b'{' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'}' {
                    i += 2;
                    continue;
                }
                panic!("MarkdownV2 template contains an opening brace outside of a placeholder");
            }
            b'(' => {
                if i == 0 || bytes[i - 1] != b']' {
                    panic!("MarkdownV2 template contains unescaped '(' outside of a link");
                }
                in_link_target = true;
            }
            b')' => {
                if !in_link_target {
                    panic!("MarkdownV2 template contains unescaped ')' outside of a link");
                }
                in_link_target = false;
            }
            b'.' | b'!' | b'-' | b'+' | b'=' | b'#' | b'}' | b'>' | b'|' => {
                if !in_link_target {
                    panic!("MarkdownV2 template contains an unescaped reserved character");
                }
            }
            _ => {}
        }
        i += 1;
    }
}
