//! Translation repository
//!
//! The read path joins languages, namespaces, keys and values; it is
//! the source behind the translation cache.

use super::{RepoError, RepoResult};
use crate::db::models::{
    Language, LanguageCreate, Namespace, NamespaceCreate, Translation, TranslationEntry,
    TranslationKey, TranslationKeyCreate, TranslationUpsert,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct TranslationRepository {
    pool: SqlitePool,
}

impl TranslationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Languages
    // =========================================================================

    pub async fn find_languages(&self) -> RepoResult<Vec<Language>> {
        let langs = sqlx::query_as::<_, Language>(
            "SELECT * FROM languages WHERE is_active = 1 ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(langs)
    }

    pub async fn find_language_by_code(&self, code: &str) -> RepoResult<Option<Language>> {
        let lang = sqlx::query_as::<_, Language>("SELECT * FROM languages WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lang)
    }

    /// Create a language; marking it default clears the previous
    /// default in the same transaction.
    pub async fn create_language(&self, data: LanguageCreate) -> RepoResult<Language> {
        let mut tx = self.pool.begin().await?;

        if data.is_default {
            sqlx::query("UPDATE languages SET is_default = 0 WHERE is_default = 1")
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query("INSERT INTO languages (code, name, is_default) VALUES (?, ?, ?)")
            .bind(&data.code)
            .bind(&data.name)
            .bind(data.is_default)
            .execute(&mut *tx)
            .await?;

        let lang = sqlx::query_as::<_, Language>("SELECT * FROM languages WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(lang)
    }

    pub async fn delete_language(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM languages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Namespaces and keys
    // =========================================================================

    pub async fn find_namespaces(&self) -> RepoResult<Vec<Namespace>> {
        let namespaces = sqlx::query_as::<_, Namespace>(
            "SELECT * FROM translation_namespaces WHERE is_active = 1 ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(namespaces)
    }

    pub async fn create_namespace(&self, data: NamespaceCreate) -> RepoResult<Namespace> {
        let result =
            sqlx::query("INSERT INTO translation_namespaces (name, description) VALUES (?, ?)")
                .bind(&data.name)
                .bind(&data.description)
                .execute(&self.pool)
                .await?;

        let ns = sqlx::query_as::<_, Namespace>("SELECT * FROM translation_namespaces WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(ns)
    }

    pub async fn find_keys(&self, namespace_id: i64) -> RepoResult<Vec<TranslationKey>> {
        let keys = sqlx::query_as::<_, TranslationKey>(
            "SELECT * FROM translation_keys WHERE namespace_id = ? AND is_active = 1 \
             ORDER BY key_path",
        )
        .bind(namespace_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(keys)
    }

    pub async fn create_key(&self, data: TranslationKeyCreate) -> RepoResult<TranslationKey> {
        let result = sqlx::query(
            "INSERT INTO translation_keys (namespace_id, key_path, description) VALUES (?, ?, ?)",
        )
        .bind(data.namespace_id)
        .bind(&data.key_path)
        .bind(&data.description)
        .execute(&self.pool)
        .await?;

        let key = sqlx::query_as::<_, TranslationKey>("SELECT * FROM translation_keys WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(key)
    }

    // =========================================================================
    // Translations
    // =========================================================================

    /// All active entries for one language + namespace, joined across
    /// the four tables. This is the query the cache fronts.
    pub async fn find_entries(
        &self,
        language_code: &str,
        namespace: &str,
    ) -> RepoResult<Vec<TranslationEntry>> {
        let entries = sqlx::query_as::<_, TranslationEntry>(
            "SELECT tk.key_path, t.value \
             FROM translations t \
             JOIN languages l ON l.id = t.language_id \
             JOIN translation_keys tk ON tk.id = t.key_id \
             JOIN translation_namespaces tn ON tn.id = tk.namespace_id \
             WHERE l.code = ? AND tn.name = ? \
               AND t.is_active = 1 AND l.is_active = 1 \
               AND tk.is_active = 1 AND tn.is_active = 1 \
             ORDER BY tk.key_path",
        )
        .bind(language_code)
        .bind(namespace)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Upsert one translation value. The key is created on first use;
    /// language and namespace must already exist.
    pub async fn upsert(&self, data: TranslationUpsert) -> RepoResult<Translation> {
        let mut tx = self.pool.begin().await?;

        let language_id: Option<i64> = sqlx::query_scalar("SELECT id FROM languages WHERE code = ?")
            .bind(&data.language_code)
            .fetch_optional(&mut *tx)
            .await?;
        let language_id = language_id.ok_or_else(|| {
            RepoError::NotFound(format!("Language '{}' not found", data.language_code))
        })?;

        let namespace_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM translation_namespaces WHERE name = ?")
                .bind(&data.namespace)
                .fetch_optional(&mut *tx)
                .await?;
        let namespace_id = namespace_id.ok_or_else(|| {
            RepoError::NotFound(format!("Namespace '{}' not found", data.namespace))
        })?;

        let key_id: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM translation_keys WHERE namespace_id = ? AND key_path = ?",
        )
        .bind(namespace_id)
        .bind(&data.key_path)
        .fetch_optional(&mut *tx)
        .await?;
        let key_id = match key_id {
            Some(id) => id,
            None => {
                let result = sqlx::query(
                    "INSERT INTO translation_keys (namespace_id, key_path) VALUES (?, ?)",
                )
                .bind(namespace_id)
                .bind(&data.key_path)
                .execute(&mut *tx)
                .await?;
                result.last_insert_rowid()
            }
        };

        sqlx::query(
            "INSERT INTO translations (language_id, key_id, value, notes) VALUES (?, ?, ?, ?) \
             ON CONFLICT (language_id, key_id) DO UPDATE SET \
             value = excluded.value, notes = excluded.notes, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(language_id)
        .bind(key_id)
        .bind(&data.value)
        .bind(&data.notes)
        .execute(&mut *tx)
        .await?;

        let translation = sqlx::query_as::<_, Translation>(
            "SELECT * FROM translations WHERE language_id = ? AND key_id = ?",
        )
        .bind(language_id)
        .bind(key_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(translation)
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM translations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> TranslationRepository {
        TranslationRepository::new(DbService::in_memory().await.unwrap().pool)
    }

    async fn seed(repo: &TranslationRepository) {
        repo.create_language(LanguageCreate {
            code: "en".to_string(),
            name: "English".to_string(),
            is_default: true,
        })
        .await
        .unwrap();
        repo.create_namespace(NamespaceCreate {
            name: "checkout".to_string(),
            description: None,
        })
        .await
        .unwrap();
    }

    fn upsert(key_path: &str, value: &str) -> TranslationUpsert {
        TranslationUpsert {
            language_code: "en".to_string(),
            namespace: "checkout".to_string(),
            key_path: key_path.to_string(),
            value: value.to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn upsert_creates_key_on_first_use() {
        let repo = repo().await;
        seed(&repo).await;

        repo.upsert(upsert("button.submit", "Place order")).await.unwrap();

        let namespaces = repo.find_namespaces().await.unwrap();
        let keys = repo.find_keys(namespaces[0].id).await.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key_path, "button.submit");
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_value() {
        let repo = repo().await;
        seed(&repo).await;

        let first = repo.upsert(upsert("title", "Checkout")).await.unwrap();
        let second = repo.upsert(upsert("title", "Check out")).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.value, "Check out");

        let entries = repo.find_entries("en", "checkout").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, "Check out");
    }

    #[tokio::test]
    async fn upsert_requires_existing_language_and_namespace() {
        let repo = repo().await;
        seed(&repo).await;

        let mut bad_lang = upsert("title", "Titel");
        bad_lang.language_code = "de".to_string();
        assert!(matches!(
            repo.upsert(bad_lang).await,
            Err(RepoError::NotFound(_))
        ));

        let mut bad_ns = upsert("title", "Checkout");
        bad_ns.namespace = "emails".to_string();
        assert!(matches!(
            repo.upsert(bad_ns).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn entries_are_sorted_by_key_path() {
        let repo = repo().await;
        seed(&repo).await;

        repo.upsert(upsert("zeta", "Z")).await.unwrap();
        repo.upsert(upsert("alpha", "A")).await.unwrap();

        let entries = repo.find_entries("en", "checkout").await.unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.key_path.as_str()).collect();
        assert_eq!(paths, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn new_default_language_clears_the_previous_one() {
        let repo = repo().await;
        seed(&repo).await;

        repo.create_language(LanguageCreate {
            code: "pt-BR".to_string(),
            name: "Portuguese (Brazil)".to_string(),
            is_default: true,
        })
        .await
        .unwrap();

        let langs = repo.find_languages().await.unwrap();
        let defaults: Vec<&str> = langs
            .iter()
            .filter(|l| l.is_default)
            .map(|l| l.code.as_str())
            .collect();
        assert_eq!(defaults, vec!["pt-BR"]);
    }

    #[tokio::test]
    async fn duplicate_language_code_is_rejected() {
        let repo = repo().await;
        seed(&repo).await;

        let result = repo
            .create_language(LanguageCreate {
                code: "en".to_string(),
                name: "English (US)".to_string(),
                is_default: false,
            })
            .await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }
}
