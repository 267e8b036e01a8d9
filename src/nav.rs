//! Subtree skipping over a flat token array.
//!
//! The planner walks an array of workspace objects but only reads a few
//! top-level fields of each; the nested geometry and window containers are
//! dead weight. [`skip_subtree`] jumps from any token to the first token past
//! its entire subtree, so sibling records can be visited without touching
//! what lies between.
//!
//! A plain implementation scans forward token by token — O(subtree size).
//! Because the token sequence is in document order, a subtree's tokens all
//! start inside its byte span, so the subtree's *byte width* predicts its
//! token count. The skip therefore makes an estimated jump of
//! `width / AVG_TOKEN_BYTES` and then self-corrects with a short linear scan:
//! forward if the estimate landed inside the span, backward (then one step
//! forward) if it overshot. On the roughly uniform-density trees the manager
//! emits, the correction is a handful of steps.
//!
//! The estimate is purely a performance device. For every input,
//! `skip_subtree` returns exactly what the linear scan would — the test
//! module checks that equivalence index by index over fixtures chosen to
//! force both correction directions.

use crate::tokens::Token;

/// Tuned average byte width of one token in a manager reply.
///
/// Workspace replies are dominated by short keys, short strings, and small
/// integers; 16 bytes per token is close enough that the correction scan
/// stays short in either direction.
pub const AVG_TOKEN_BYTES: usize = 16;

/// Return the index of the first token whose span begins at or after the end
/// of the subtree rooted at `i`, or `tokens.len()` if none does.
///
/// For a leaf this is simply the next index; for a container it is the index
/// just past the last descendant.
pub fn skip_subtree(tokens: &[Token], i: usize) -> usize {
    let end = tokens[i].end;
    let len = tokens.len();
    let width = end.saturating_sub(tokens[i].start);

    let mut j = (i + 1 + width / AVG_TOKEN_BYTES).min(len);
    if j < len && tokens[j].start < end {
        // Undershot: still inside the subtree, walk forward out of it.
        while j < len && tokens[j].start < end {
            j += 1;
        }
    } else {
        // Overshot (or clamped to the end): walk back to the last token still
        // inside the span, then step past it. tokens[i] itself is inside, so
        // this terminates at i + 1 in the worst case.
        while j > i + 1 && tokens[j - 1].start >= end {
            j -= 1;
        }
    }
    j
}

/// Reference implementation: plain linear scan. The behavioral contract of
/// [`skip_subtree`], kept callable so the tests can compare the two.
#[cfg(test)]
fn skip_subtree_linear(tokens: &[Token], i: usize) -> usize {
    let end = tokens[i].end;
    let mut j = i + 1;
    while j < tokens.len() && tokens[j].start < end {
        j += 1;
    }
    j
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::parse;

    /// The critical property: for every token of every fixture, the estimated
    /// jump and the linear scan agree exactly.
    fn assert_skip_equivalence(buf: &[u8]) {
        let tokens = parse(buf).unwrap();
        for i in 0..tokens.len() {
            assert_eq!(
                skip_subtree(&tokens, i),
                skip_subtree_linear(&tokens, i),
                "divergence at token {} of {:?}",
                i,
                String::from_utf8_lossy(buf),
            );
        }
    }

    #[test]
    fn equivalence_on_workspace_reply() {
        assert_skip_equivalence(
            br#"[{"num": 1, "name": "1", "visible": true, "focused": true,
                "rect": {"x": 0, "y": 0, "width": 1280, "height": 800},
                "output": "LVDS1", "urgent": false},
               {"num": 2, "name": "web", "visible": false, "focused": false,
                "rect": {"x": 0, "y": 0, "width": 1280, "height": 800},
                "output": "VGA1", "urgent": false}]"#,
        );
    }

    #[test]
    fn equivalence_on_dense_tokens() {
        // Many one-byte tokens: the byte-width estimate undershoots badly and
        // the forward correction has to do the work.
        assert_skip_equivalence(b"[1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1]");
        assert_skip_equivalence(b"[[1,1],[1,1],[1,1],[1,1],[1,1],[1,1],[1,1]]");
    }

    #[test]
    fn equivalence_on_sparse_tokens() {
        // Few tokens with very wide spans: the estimate overshoots and the
        // backward correction has to recover.
        assert_skip_equivalence(
            br#"["aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"]"#,
        );
        assert_skip_equivalence(
            br#"{"k": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}"#,
        );
    }

    #[test]
    fn equivalence_on_deep_nesting() {
        assert_skip_equivalence(br#"[[[[[[[[["deep"]]]]]]]]]"#);
        assert_skip_equivalence(br#"{"a":{"b":{"c":{"d":[1,2,3]}}}}"#);
    }

    #[test]
    fn leaf_skips_to_next_index() {
        let buf = b"[1, 2, 3]";
        let tokens = parse(buf).unwrap();
        assert_eq!(skip_subtree(&tokens, 1), 2);
        assert_eq!(skip_subtree(&tokens, 2), 3);
        // Last leaf: past the end of the sequence.
        assert_eq!(skip_subtree(&tokens, 3), 4);
    }

    #[test]
    fn root_skips_to_sequence_length() {
        let buf = br#"[{"a": 1}, {"b": 2}]"#;
        let tokens = parse(buf).unwrap();
        assert_eq!(skip_subtree(&tokens, 0), tokens.len());
    }

    #[test]
    fn sibling_objects_chain() {
        let buf = br#"[{"a": 1, "z": [9, 9, 9]}, {"b": 2}, {"c": 3}]"#;
        let tokens = parse(buf).unwrap();
        // First workspace object is token 1; hopping subtrees visits each
        // sibling object exactly once.
        let mut i = 1;
        let mut visited = Vec::new();
        while i < tokens.len() {
            visited.push(i);
            i = skip_subtree(&tokens, i);
        }
        assert_eq!(visited.len(), 3);
        for &v in &visited {
            assert_eq!(tokens[v].parent, Some(0));
        }
    }
}
