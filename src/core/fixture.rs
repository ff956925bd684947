//! Built-in sample thread for `--demo` and tests.

use crate::core::comment::{Comment, ThreadTree};

/// Author of the post the sample thread hangs off.
pub const SAMPLE_POST_AUTHOR: &str = "music_fan_99";

pub fn sample_comments() -> Vec<Comment> {
    vec![
        Comment::new(
            1,
            "audiophile_king",
            "This is exactly what I was looking for! The transition from track 3 to 4 is legendary.",
        )
        .with_label("2 hours ago")
        .with_score(450)
        .with_children(vec![
            Comment::new(
                11,
                "music_fan_99",
                "Glad you liked it! It took me forever to find that specific cover.",
            )
            .with_label("1 hour ago")
            .with_score(120)
            .with_children(vec![
                Comment::new(111, "random_user", "Do you have a Soundcloud link for it?")
                    .with_label("30 mins ago")
                    .with_score(5),
            ]),
            Comment::new(12, "hater_101", "Unpopular opinion: The original was better.")
                .with_label("50 mins ago")
                .with_score(-12),
        ]),
        Comment::new(
            2,
            "coding_wizard",
            "Can someone explain the context of the third song? I feel like I'm missing something.",
        )
        .with_label("5 hours ago")
        .with_score(89)
        .with_children(vec![
            Comment::new(
                21,
                "lore_master",
                "It's a reference to the 2008 incident where the lead singer...",
            )
            .with_label("3 hours ago")
            .with_score(230),
        ]),
    ]
}

/// The sample comments as a tree, with the post author flagged as OP.
pub fn sample_thread() -> ThreadTree {
    let mut tree = ThreadTree::new(sample_comments()).unwrap_or_default();
    tree.mark_original_poster(SAMPLE_POST_AUTHOR);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comment::CommentId;

    #[test]
    fn test_sample_thread_shape() {
        let tree = sample_thread();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.len(), 6);
        assert!(tree.find(CommentId(11)).unwrap().is_original_poster);
        assert!(!tree.find(CommentId(1)).unwrap().is_original_poster);
    }
}
