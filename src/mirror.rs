/// Whole-word side tokens, swapped in both directions.
const SIDE_TOKENS: &[(&str, &str)] = &[
    ("Left", "Right"),
    ("left", "right"),
    ("LEFT", "RIGHT"),
    ("L", "R"),
    ("l", "r"),
];

/// The left/right-swapped counterpart of a bone name, or `None` when the name
/// has no side.
///
/// The name is split into tokens at spaces and underscores and each token is
/// swapped through [SIDE_TOKENS] as a whole word: `"Left Hand"` becomes
/// `"Right Hand"`, `"bone_l"` becomes `"bone_r"`. Substrings inside larger
/// tokens are never touched, so names like `"Pelvis"` stay intact.
pub fn mirrored_name(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    let mut swapped = false;

    for piece in name.split_inclusive(['_', ' ']) {
        let (token, separator) = match piece.strip_suffix(['_', ' ']) {
            Some(token) => (token, &piece[token.len()..]),
            None => (piece, ""),
        };

        match swap_token(token) {
            Some(opposite) => {
                swapped = true;
                out.push_str(opposite);
            }
            None => out.push_str(token),
        }
        out.push_str(separator);
    }

    swapped.then_some(out)
}

fn swap_token(token: &str) -> Option<&'static str> {
    for (left, right) in SIDE_TOKENS {
        if token == *left {
            return Some(right);
        }
        if token == *right {
            return Some(left);
        }
    }
    None
}
