//! Property-based tests for the applied-action cleanup rules

use notebrain_sync::client::offline::is_reflected;
use notebrain_sync::shared::{Article, ArticleStatus, Intent};
use proptest::prelude::*;

fn arb_article() -> impl Strategy<Value = Article> {
    (1i64..100, any::<bool>(), any::<bool>(), proptest::option::of("[ a-z]{0,8}")).prop_map(
        |(id, starred, archived, summary)| {
            let mut article = Article::new(id, format!("https://example.com/{id}"));
            article.starred = starred;
            article.summary = summary;
            if archived {
                article.status = ArticleStatus::Archived;
            }
            article
        },
    )
}

proptest! {
    #[test]
    fn test_star_and_unstar_are_mutually_exclusive(article in arb_article()) {
        let star = is_reflected(&Intent::star(article.id), Some(&article));
        let unstar = is_reflected(&Intent::unstar(article.id), Some(&article));
        prop_assert_ne!(star, unstar);
    }

    #[test]
    fn test_present_article_never_confirms_delete(article in arb_article()) {
        prop_assert!(!is_reflected(&Intent::delete(article.id), Some(&article)));
    }

    #[test]
    fn test_summarize_follows_summary_text(article in arb_article()) {
        prop_assert_eq!(
            is_reflected(&Intent::summarize(article.id), Some(&article)),
            article.has_summary()
        );
    }

    #[test]
    fn test_new_urls_are_never_confirmed(slug in "[a-z]{1,10}", article in proptest::option::of(arb_article())) {
        let intent = Intent::add_url(format!("https://{slug}.example"));
        prop_assert!(!is_reflected(&intent, article.as_ref()));
    }
}
