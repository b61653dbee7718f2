//! Link creation and retrieval service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use tracing::warn;

use crate::domain::clock::Clock;
use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::validation::{validate_custom_alias, validate_long_url};

/// Maximum random-generation attempts before giving up.
///
/// At 62^7 combinations this budget is only reachable under pathological
/// namespace saturation.
const MAX_COLLISION_RETRIES: usize = 10;

/// Allocation settings injected at construction.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Base URL prepended to short codes in responses.
    pub base_url: String,
    /// Length of randomly generated short codes.
    pub code_length: usize,
    /// Upper bound on each cache operation; a timeout counts as a failure.
    pub cache_op_timeout: Duration,
}

/// Service for allocating and retrieving short links.
///
/// Decides custom-alias vs. random allocation, enforces uniqueness against
/// the store, retries random collisions, persists, and populates the cache
/// best-effort. The store is the single source of truth; a cache failure
/// never fails the write.
pub struct LinkService {
    repository: Arc<dyn ShortLinkRepository>,
    cache: Arc<dyn CacheService>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    config: LinkConfig,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        repository: Arc<dyn ShortLinkRepository>,
        cache: Arc<dyn CacheService>,
        generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        config: LinkConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            generator,
            clock,
            config,
        }
    }

    /// Creates a short link.
    ///
    /// # Strategy
    ///
    /// 1. Custom alias provided and non-blank: validate, check uniqueness,
    ///    persist with that exact code.
    /// 2. Otherwise: generate a random code of the configured length,
    ///    retrying on collision up to 10 times.
    /// 3. After a successful persist, push the mapping into the cache with a
    ///    TTL aligned to the expiry time. Cache failures are logged and
    ///    swallowed.
    ///
    /// An `expiry_at` in the past is accepted: the record is persisted and
    /// returned, and the next expiry sweep deactivates it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed URL or alias,
    /// [`AppError::Conflict`] when the requested alias is taken, and
    /// [`AppError::Exhausted`] when the random retry budget runs out.
    pub async fn create_short_link(
        &self,
        long_url: String,
        custom_alias: Option<String>,
        expiry_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<ShortLink, AppError> {
        validate_long_url(&long_url)?;

        let link = match custom_alias.filter(|alias| !alias.trim().is_empty()) {
            Some(alias) => self.create_with_alias(long_url, alias, expiry_at).await?,
            None => self.create_with_random_code(long_url, expiry_at).await?,
        };

        // Advisory: the write already succeeded against the store.
        self.populate_cache(&link).await;

        Ok(link)
    }

    /// Retrieves a link by its short code.
    ///
    /// Reads the store directly; this informational path is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_short_link(&self, short_code: &str) -> Result<ShortLink, AppError> {
        self.repository
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("Short code not found: {}", short_code),
                    json!({ "short_code": short_code }),
                )
            })
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            short_code
        )
    }

    /// Persists a link under a caller-chosen alias.
    ///
    /// A uniqueness violation at insert time (another writer raced the
    /// pre-check) is reported as the same conflict: the caller chose this
    /// exact alias, so retrying cannot help.
    async fn create_with_alias(
        &self,
        long_url: String,
        alias: String,
        expiry_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<ShortLink, AppError> {
        validate_custom_alias(&alias)?;

        if self.repository.exists(&alias).await? {
            return Err(Self::alias_conflict(&alias));
        }

        self.repository
            .insert(NewShortLink {
                short_code: alias.clone(),
                long_url,
                expiry_at,
                owner_id: None,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => Self::alias_conflict(&alias),
                other => other,
            })
    }

    /// Allocates a random code with collision retry.
    ///
    /// The exists-then-insert pair is not atomic; a uniqueness violation at
    /// insert counts as a collision and consumes an attempt like any other.
    async fn create_with_random_code(
        &self,
        long_url: String,
        expiry_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<ShortLink, AppError> {
        for attempt in 1..=MAX_COLLISION_RETRIES {
            let code = self.generator.generate(self.config.code_length);

            if self.repository.exists(&code).await? {
                warn!(attempt, "short code collision, retrying");
                continue;
            }

            match self
                .repository
                .insert(NewShortLink {
                    short_code: code,
                    long_url: long_url.clone(),
                    expiry_at,
                    owner_id: None,
                })
                .await
            {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "short code collision at insert, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::exhausted(
            "Failed to generate a unique short code",
            json!({ "attempts": MAX_COLLISION_RETRIES }),
        ))
    }

    fn alias_conflict(alias: &str) -> AppError {
        AppError::conflict(
            format!("Alias '{}' is already taken", alias),
            json!({ "alias": alias }),
        )
    }

    /// Pushes the mapping into the cache, best-effort.
    ///
    /// The entry's TTL is the remaining time until `expiry_at`; a
    /// non-positive remainder (record created already expired, or clock
    /// skew) skips the TTL silently. Failures and timeouts are logged at
    /// warn and discarded.
    async fn populate_cache(&self, link: &ShortLink) {
        let set = timeout(
            self.config.cache_op_timeout,
            self.cache.set_url(&link.short_code, &link.long_url),
        )
        .await;

        match set {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(short_code = %link.short_code, error = %e, "failed to cache URL mapping");
                return;
            }
            Err(_) => {
                warn!(short_code = %link.short_code, "cache write timed out");
                return;
            }
        }

        let Some(expiry_at) = link.expiry_at else {
            return;
        };

        let ttl_seconds = (expiry_at - self.clock.now()).num_seconds();
        if ttl_seconds <= 0 {
            return;
        }

        let expire = timeout(
            self.config.cache_op_timeout,
            self.cache.set_expiry(&link.short_code, ttl_seconds as u64),
        )
        .await;

        match expire {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(short_code = %link.short_code, error = %e, "failed to set cache TTL");
            }
            Err(_) => {
                warn!(short_code = %link.short_code, "cache TTL write timed out");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::MockClock;
    use crate::domain::repositories::MockShortLinkRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService, NullCache};
    use crate::utils::code_generator::MockCodeGenerator;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};

    fn test_config() -> LinkConfig {
        LinkConfig {
            base_url: "https://sho.rt".to_string(),
            code_length: 7,
            cache_op_timeout: Duration::from_millis(100),
        }
    }

    fn fixed_clock(now: DateTime<Utc>) -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || now);
        clock
    }

    fn persisted(code: &str, url: &str, expiry_at: Option<DateTime<Utc>>) -> ShortLink {
        ShortLink::new(
            10,
            code.to_string(),
            url.to_string(),
            Utc::now(),
            expiry_at,
            None,
            true,
        )
    }

    fn service(
        repo: MockShortLinkRepository,
        cache: impl CacheService + 'static,
        generator: MockCodeGenerator,
        clock: MockClock,
    ) -> LinkService {
        LinkService::new(
            Arc::new(repo),
            Arc::new(cache),
            Arc::new(generator),
            Arc::new(clock),
            test_config(),
        )
    }

    #[tokio::test]
    async fn test_create_random_code_success() {
        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .withf(|&len| len == 7)
            .times(1)
            .returning(|_| "abc1234".to_string());

        repo.expect_exists()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|_| Ok(false));

        let created = persisted("abc1234", "https://example.com", None);
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "abc1234" && new_link.expiry_at.is_none())
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let service = service(repo, NullCache, generator, MockClock::new());

        let link = service
            .create_short_link("https://example.com".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(link.short_code.len(), 7);
        assert_eq!(link.long_url, "https://example.com");
        assert!(link.expiry_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let service = service(
            MockShortLinkRepository::new(),
            NullCache,
            MockCodeGenerator::new(),
            MockClock::new(),
        );

        let result = service
            .create_short_link("not-a-url".to_string(), None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_with_custom_alias() {
        let mut repo = MockShortLinkRepository::new();

        repo.expect_exists()
            .withf(|code| code == "promo25")
            .times(1)
            .returning(|_| Ok(false));

        let created = persisted("promo25", "https://example.com", None);
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "promo25")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let service = service(repo, NullCache, MockCodeGenerator::new(), MockClock::new());

        let link = service
            .create_short_link(
                "https://example.com".to_string(),
                Some("promo25".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(link.short_code, "promo25");
    }

    #[tokio::test]
    async fn test_blank_alias_falls_back_to_random() {
        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .times(1)
            .returning(|_| "r4ndom7".to_string());

        repo.expect_exists().times(1).returning(|_| Ok(false));

        let created = persisted("r4ndom7", "https://example.com", None);
        repo.expect_insert()
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let service = service(repo, NullCache, generator, MockClock::new());

        let link = service
            .create_short_link(
                "https://example.com".to_string(),
                Some("   ".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(link.short_code, "r4ndom7");
    }

    #[tokio::test]
    async fn test_custom_alias_conflict() {
        let mut repo = MockShortLinkRepository::new();

        repo.expect_exists()
            .withf(|code| code == "taken")
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let service = service(repo, NullCache, MockCodeGenerator::new(), MockClock::new());

        let result = service
            .create_short_link(
                "https://example.com".to_string(),
                Some("taken".to_string()),
                None,
            )
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(err.to_string().contains("taken"));
    }

    #[tokio::test]
    async fn test_custom_alias_insert_race_maps_to_conflict() {
        let mut repo = MockShortLinkRepository::new();

        // Pre-check passes, but another writer claims the alias before insert.
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert().times(1).returning(|_| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_links_short_code_key" }),
            ))
        });

        let service = service(repo, NullCache, MockCodeGenerator::new(), MockClock::new());

        let result = service
            .create_short_link(
                "https://example.com".to_string(),
                Some("raced".to_string()),
                None,
            )
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert!(err.to_string().contains("raced"));
    }

    #[tokio::test]
    async fn test_random_allocation_retries_on_collision() {
        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();

        // Same colliding code three times, then a free one.
        let mut calls = 0;
        generator.expect_generate().times(4).returning(move |_| {
            calls += 1;
            if calls <= 3 {
                "collide".to_string()
            } else {
                "free123".to_string()
            }
        });

        repo.expect_exists()
            .withf(|code| code == "collide")
            .times(3)
            .returning(|_| Ok(true));
        repo.expect_exists()
            .withf(|code| code == "free123")
            .times(1)
            .returning(|_| Ok(false));

        let created = persisted("free123", "https://example.com", None);
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "free123")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let service = service(repo, NullCache, generator, MockClock::new());

        let link = service
            .create_short_link("https://example.com".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(link.short_code, "free123");
    }

    #[tokio::test]
    async fn test_random_allocation_exhausts_retry_budget() {
        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .times(10)
            .returning(|_| "collide".to_string());
        repo.expect_exists().times(10).returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let service = service(repo, NullCache, generator, MockClock::new());

        let result = service
            .create_short_link("https://example.com".to_string(), None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Exhausted { .. }));
    }

    #[tokio::test]
    async fn test_insert_race_on_random_code_counts_as_collision() {
        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();

        let mut calls = 0;
        generator.expect_generate().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                "raced12".to_string()
            } else {
                "fresh34".to_string()
            }
        });

        repo.expect_exists().times(2).returning(|_| Ok(false));

        let mut inserts = 0;
        let created = persisted("fresh34", "https://example.com", None);
        repo.expect_insert().times(2).returning(move |_| {
            inserts += 1;
            if inserts == 1 {
                Err(AppError::conflict("Unique constraint violation", json!({})))
            } else {
                Ok(created.clone())
            }
        });

        let service = service(repo, NullCache, generator, MockClock::new());

        let link = service
            .create_short_link("https://example.com".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(link.short_code, "fresh34");
    }

    #[tokio::test]
    async fn test_cache_failure_does_not_fail_creation() {
        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();
        let mut cache = MockCacheService::new();

        generator
            .expect_generate()
            .times(1)
            .returning(|_| "abc1234".to_string());
        repo.expect_exists().times(1).returning(|_| Ok(false));

        let created = persisted("abc1234", "https://example.com", None);
        repo.expect_insert()
            .times(1)
            .returning(move |_| Ok(created.clone()));

        cache
            .expect_set_url()
            .times(1)
            .returning(|_, _| Err(CacheError::Operation("connection refused".to_string())));
        cache.expect_set_expiry().times(0);

        let service = service(repo, cache, generator, MockClock::new());

        let result = service
            .create_short_link("https://example.com".to_string(), None, None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_cache_gets_ttl_aligned_to_expiry() {
        let now = Utc::now();
        let expiry_at = now + ChronoDuration::seconds(600);

        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();
        let mut cache = MockCacheService::new();

        generator
            .expect_generate()
            .times(1)
            .returning(|_| "abc1234".to_string());
        repo.expect_exists().times(1).returning(|_| Ok(false));

        let created = persisted("abc1234", "https://example.com", Some(expiry_at));
        repo.expect_insert()
            .times(1)
            .returning(move |_| Ok(created.clone()));

        cache
            .expect_set_url()
            .withf(|code, url| code == "abc1234" && url == "https://example.com")
            .times(1)
            .returning(|_, _| Ok(()));
        cache
            .expect_set_expiry()
            .withf(|code, ttl| code == "abc1234" && *ttl == 600)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo, cache, generator, fixed_clock(now));

        let link = service
            .create_short_link("https://example.com".to_string(), None, Some(expiry_at))
            .await
            .unwrap();

        assert_eq!(link.expiry_at, Some(expiry_at));
    }

    #[tokio::test]
    async fn test_past_expiry_is_persisted_without_cache_ttl() {
        let now = Utc::now();
        let expiry_at = now - ChronoDuration::hours(1);

        let mut repo = MockShortLinkRepository::new();
        let mut generator = MockCodeGenerator::new();
        let mut cache = MockCacheService::new();

        generator
            .expect_generate()
            .times(1)
            .returning(|_| "abc1234".to_string());
        repo.expect_exists().times(1).returning(|_| Ok(false));

        let created = persisted("abc1234", "https://example.com", Some(expiry_at));
        repo.expect_insert()
            .withf(move |new_link| new_link.expiry_at == Some(expiry_at))
            .times(1)
            .returning(move |_| Ok(created.clone()));

        cache.expect_set_url().times(1).returning(|_, _| Ok(()));
        // Already expired: the TTL step is skipped silently.
        cache.expect_set_expiry().times(0);

        let service = service(repo, cache, generator, fixed_clock(now));

        let link = service
            .create_short_link("https://example.com".to_string(), None, Some(expiry_at))
            .await
            .unwrap();

        assert_eq!(link.expiry_at, Some(expiry_at));
    }

    #[tokio::test]
    async fn test_get_short_link_found() {
        let mut repo = MockShortLinkRepository::new();

        let existing = persisted("abc1234", "https://example.com", None);
        repo.expect_find_by_short_code()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        let service = service(repo, NullCache, MockCodeGenerator::new(), MockClock::new());

        let link = service.get_short_link("abc1234").await.unwrap();
        assert_eq!(link.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_get_short_link_not_found() {
        let mut repo = MockShortLinkRepository::new();

        repo.expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repo, NullCache, MockCodeGenerator::new(), MockClock::new());

        let result = service.get_short_link("missing").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = LinkService::new(
            Arc::new(MockShortLinkRepository::new()),
            Arc::new(NullCache),
            Arc::new(MockCodeGenerator::new()),
            Arc::new(MockClock::new()),
            LinkConfig {
                base_url: "https://sho.rt/".to_string(),
                code_length: 7,
                cache_op_timeout: Duration::from_millis(100),
            },
        );

        assert_eq!(service.short_url("abc1234"), "https://sho.rt/abc1234");
    }
}
