use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use ra_core::{Article, ArticlePatch, ArticleSource, Error, Location, Result, Scope, Summarizer};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Article saved `age_days` days before a fixed reference date.
pub fn article(id: &str, location: Location, age_days: i64) -> Article {
    let reference = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Article {
        id: id.to_string(),
        title: Some(format!("Title {}", id)),
        category: Some("article".to_string()),
        location: Some(location),
        source_url: Some(format!("https://www.example.com/{}", id)),
        content: Some(format!("Body of {} with a few words", id)),
        saved_at: Some(reference - ChronoDuration::days(age_days)),
        ..Default::default()
    }
}

/// In-process stand-in for the article store.
#[derive(Default)]
pub struct MockSource {
    pub articles: Mutex<Vec<Article>>,
    pub fail_list: bool,
    pub fail_mutations: bool,
    pub mutations: Mutex<Vec<(String, ArticlePatch)>>,
}

impl MockSource {
    pub fn with(articles: Vec<Article>) -> Self {
        Self {
            articles: Mutex::new(articles),
            ..Default::default()
        }
    }

    pub fn location_of(&self, id: &str) -> Option<Location> {
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .map(Article::location)
    }
}

#[async_trait]
impl ArticleSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_candidates(&self, scope: Scope) -> Result<Vec<Article>> {
        if self.fail_list {
            return Err(Error::Upstream {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        let mut articles: Vec<Article> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_candidate() && scope.includes(a.location()))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(articles)
    }

    async fn mutate(&self, id: &str, patch: &ArticlePatch) -> Result<()> {
        if self.fail_mutations {
            return Err(Error::Upstream {
                status: 503,
                message: "unavailable".into(),
            });
        }
        self.mutations.lock().unwrap().push((id.to_string(), patch.clone()));
        let mut articles = self.articles.lock().unwrap();
        match articles.iter_mut().find(|a| a.id == id) {
            Some(article) => {
                if let Some(location) = patch.location {
                    article.location = Some(location);
                }
                Ok(())
            }
            None => Err(Error::Upstream {
                status: 404,
                message: "not found".into(),
            }),
        }
    }

    async fn remove(&self, id: &str) -> Result<()> {
        if self.fail_mutations {
            return Err(Error::Upstream {
                status: 500,
                message: "boom".into(),
            });
        }
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| a.id != id);
        if articles.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Summarizer that counts calls and fails for chosen ids.
#[derive(Default)]
pub struct ScriptedSummarizer {
    pub calls: AtomicUsize,
    pub rate_limited: HashSet<String>,
    pub unconfigured: bool,
}

impl ScriptedSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn summarize(&self, article: &Article) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unconfigured {
            return Err(Error::Configuration("Summarizer API key is not configured".into()));
        }
        if self.rate_limited.contains(&article.id) {
            return Err(Error::Summarizer {
                status: 429,
                body: "rate limited".into(),
            });
        }
        Ok(format!("Summary of {}", article.id))
    }
}
