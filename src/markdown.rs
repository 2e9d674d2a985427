/// Characters Telegram's MarkdownV2 treats as markup.
#[allow(dead_code)]
const RESERVED: [char; 17] = [
    '_', '*', '[', ']', '(', ')', '~', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

#[allow(dead_code)]
const FENCE: &str = "```";

/// Prepare arbitrary text for a MarkdownV2 message: escape reserved
/// punctuation, then close any dangling code fence or inline code span.
#[allow(dead_code)]
pub fn repair(text: &str) -> String {
    fix_fences(&escape_markdown_v2(text))
}

/// Prefix every reserved MarkdownV2 character with a backslash.
#[allow(dead_code)]
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Balance triple and single backtick markers by parity.
///
/// Trailing backticks are dropped first; an odd number of fences gets one
/// closing fence, and an odd number of single backticks (fences excluded)
/// gets one closing backtick. This does not parse nesting.
#[allow(dead_code)]
pub fn fix_fences(text: &str) -> String {
    let mut text = text.trim_end_matches('`').to_string();

    let fences = text.matches(FENCE).count();
    let singles = text.replace(FENCE, "").matches('`').count();

    if fences % 2 == 1 {
        text.push_str(FENCE);
    }
    if singles % 2 == 1 {
        text.push('`');
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parities(text: &str) -> (usize, usize) {
        let fences = text.matches(FENCE).count();
        let singles = text.replace(FENCE, "").matches('`').count();
        (fences % 2, singles % 2)
    }

    #[test]
    fn test_escapes_every_reserved_character() {
        let out = escape_markdown_v2("_*[]()~>#+-=|{}.!");
        assert_eq!(out, r"\_\*\[\]\(\)\~\>\#\+\-\=\|\{\}\.\!");
    }

    #[test]
    fn test_leaves_plain_text_untouched() {
        assert_eq!(escape_markdown_v2("hello world 100%"), "hello world 100%");
        assert_eq!(escape_markdown_v2("привет"), "привет");
    }

    #[test]
    fn test_underscore_scenario() {
        let out = repair("100% done_now");
        assert_eq!(out, r"100% done\_now");
        assert_eq!(parities(&out), (0, 0));
    }

    #[test]
    fn test_strips_trailing_backticks() {
        assert_eq!(fix_fences("code``"), "code");
        assert_eq!(fix_fences("```"), "");
    }

    #[test]
    fn test_closes_dangling_fence() {
        assert_eq!(fix_fences("```rust\nlet x = 1;"), "```rust\nlet x = 1;```");
    }

    #[test]
    fn test_closes_dangling_inline_code() {
        assert_eq!(fix_fences("run `ls now"), "run `ls now`");
    }

    #[test]
    fn test_balanced_text_is_unchanged() {
        let text = "use `a` and ```b``` here";
        assert_eq!(fix_fences(text), text);
    }

    #[test]
    fn test_fence_and_inline_are_counted_separately() {
        let out = fix_fences("```x `y");
        assert_eq!(out, "```x `y````");
        assert_eq!(parities(&out), (0, 0));
    }

    #[test]
    fn test_reapplying_never_adds_dangling_markers() {
        let samples = [
            "plain",
            "100% done_now",
            "```open fence",
            "`open inline",
            "mixed ``` and ` markers.",
            "trailing ticks```",
            "a ` b ` c ` d",
        ];
        for sample in samples {
            let once = repair(sample);
            let twice = repair(&once);
            assert_eq!(parities(&once), (0, 0), "dangling marker: {:?}", once);
            assert_eq!(parities(&twice), (0, 0), "dangling marker: {:?}", twice);
        }
    }
}
