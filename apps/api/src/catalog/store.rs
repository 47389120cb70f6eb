use std::collections::HashSet;

use anyhow::Result;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::identity::derive_stable_id;
use crate::catalog::import::{
    as_object, assign_id, parse_skill, stamp_category, validate_item, BatchImportReport,
    IdPolicy, ImportCounts, ItemRejection, PortfolioBundle, PortfolioImportReport,
    PortfolioSection,
};
use crate::models::catalog::{
    ContentItem, ContentItemDraft, ContentItemPatch, PersonalInfo, SkillCategory,
};
use crate::storage::DataDir;

const ITEMS_KEY: &str = "items.json";
const PERSONAL_INFO_KEY: &str = "personal_info.json";
const SKILLS_KEY: &str = "skills.json";

/// Owns the content-item collection, the personal-info singleton and the skills list.
///
/// Every read-modify-write cycle runs under `write_lock`, so concurrent requests
/// cannot lose each other's updates.
pub struct CatalogStore {
    data: DataDir,
    write_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(data: DataDir) -> Self {
        Self {
            data,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> Result<Vec<ContentItem>> {
        self.data.load_json(ITEMS_KEY).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ContentItem>> {
        Ok(self.list().await?.into_iter().find(|item| item.id == id))
    }

    /// Upserts by stable id: an item whose title normalizes to an existing id
    /// replaces that item wholesale instead of adding a second one.
    pub async fn create(&self, draft: ContentItemDraft) -> Result<ContentItem> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list().await?;

        let id = derive_stable_id(&draft.title);
        let item = draft.into_item(id);

        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                info!("Catalog item {} already exists, overwriting", item.id);
                *existing = item.clone();
            }
            None => {
                info!("Catalog item {} created", item.id);
                items.push(item.clone());
            }
        }

        self.data.save_json(ITEMS_KEY, &items).await?;
        Ok(item)
    }

    /// Applies only the supplied fields. `None` when no item has `id`.
    pub async fn update(&self, id: &str, patch: ContentItemPatch) -> Result<Option<ContentItem>> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list().await?;

        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        patch.apply_to(item);
        let updated = item.clone();

        self.data.save_json(ITEMS_KEY, &items).await?;
        debug!("Catalog item {id} updated");
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list().await?;

        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }

        self.data.save_json(ITEMS_KEY, &items).await?;
        info!("Catalog item {id} deleted");
        Ok(true)
    }

    /// Imports user-curated items. Items without an id get a random one, so
    /// entries sharing a title stay distinct. Items whose id is already taken
    /// are skipped; invalid items are reported and skipped.
    pub async fn import_batch(&self, raw_items: Vec<Value>) -> Result<BatchImportReport> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list().await?;
        let mut taken: HashSet<String> = items.iter().map(|item| item.id.clone()).collect();
        let mut report = BatchImportReport::default();

        for (index, raw) in raw_items.into_iter().enumerate() {
            let mut fields = match as_object(raw) {
                Ok(fields) => fields,
                Err(reason) => {
                    warn!("Skipping import item {index}: {reason}");
                    report.rejected.push(ItemRejection {
                        index,
                        section: None,
                        id: None,
                        reason,
                    });
                    continue;
                }
            };

            let id = match assign_id(&mut fields, IdPolicy::Random) {
                Ok(id) => id,
                Err(reason) => {
                    warn!("Skipping import item {index}: {reason}");
                    report.rejected.push(ItemRejection {
                        index,
                        section: None,
                        id: None,
                        reason,
                    });
                    continue;
                }
            };
            if taken.contains(&id) {
                debug!("Skipping import item {index}: id {id} already in catalog");
                report.duplicates_skipped += 1;
                continue;
            }

            match validate_item(fields) {
                Ok(item) => {
                    taken.insert(item.id.clone());
                    items.push(item);
                    report.imported_count += 1;
                }
                Err(reason) => {
                    warn!("Skipping import item {index} ({id}): {reason}");
                    report.rejected.push(ItemRejection {
                        index,
                        section: None,
                        id: Some(id),
                        reason,
                    });
                }
            }
        }

        if report.imported_count > 0 {
            self.data.save_json(ITEMS_KEY, &items).await?;
        }
        info!(
            "Batch import: {} imported, {} duplicates, {} rejected",
            report.imported_count,
            report.duplicates_skipped,
            report.rejected.len()
        );
        Ok(report)
    }

    /// Imports a portfolio bundle. Items without an id get the stable id of
    /// their title, so repeated imports of the same content converge. Counts
    /// only reflect what was actually added.
    pub async fn import_portfolio(&self, mut bundle: PortfolioBundle) -> Result<PortfolioImportReport> {
        let _guard = self.write_lock.lock().await;
        let mut counts = ImportCounts::default();

        if let Some(info) = bundle.personal_info.take().filter(|info| !info.is_blank()) {
            self.data.save_json(PERSONAL_INFO_KEY, &info).await?;
            counts.personal_info = 1;
        }

        let mut rejected = Vec::new();
        let mut skills: Vec<SkillCategory> = Vec::new();
        for (index, raw) in bundle.skills.take().unwrap_or_default().into_iter().enumerate() {
            match parse_skill(raw) {
                Ok(skill) => skills.push(skill),
                Err(reason) => {
                    warn!("Skipping skills entry {index}: {reason}");
                    rejected.push(ItemRejection {
                        index,
                        section: Some("skills".to_string()),
                        id: None,
                        reason,
                    });
                }
            }
        }
        if !skills.is_empty() {
            self.data.save_json(SKILLS_KEY, &skills).await?;
            counts.skills = skills.len();
        }

        let mut items = self.list().await?;
        let mut taken: HashSet<String> = items.iter().map(|item| item.id.clone()).collect();
        let mut duplicates_skipped = 0;
        let mut added = 0;

        for section in PortfolioSection::ALL {
            for (index, raw) in bundle.take_section(section).into_iter().enumerate() {
                let mut fields = match as_object(raw) {
                    Ok(fields) => fields,
                    Err(reason) => {
                        warn!("Skipping {} item {index}: {reason}", section.key());
                        rejected.push(ItemRejection {
                            index,
                            section: Some(section.key().to_string()),
                            id: None,
                            reason,
                        });
                        continue;
                    }
                };

                let id = match assign_id(&mut fields, IdPolicy::StableFromTitle) {
                    Ok(id) => id,
                    Err(reason) => {
                        warn!("Skipping {} item {index}: {reason}", section.key());
                        rejected.push(ItemRejection {
                            index,
                            section: Some(section.key().to_string()),
                            id: None,
                            reason,
                        });
                        continue;
                    }
                };
                if taken.contains(&id) {
                    debug!("Skipping {} item {index}: id {id} already in catalog", section.key());
                    duplicates_skipped += 1;
                    continue;
                }

                stamp_category(&mut fields, section.category());
                match validate_item(fields) {
                    Ok(item) => {
                        taken.insert(item.id.clone());
                        items.push(item);
                        *counts.section_mut(section) += 1;
                        added += 1;
                    }
                    Err(reason) => {
                        warn!("Skipping {} item {index} ({id}): {reason}", section.key());
                        rejected.push(ItemRejection {
                            index,
                            section: Some(section.key().to_string()),
                            id: Some(id),
                            reason,
                        });
                    }
                }
            }
        }

        if added > 0 {
            self.data.save_json(ITEMS_KEY, &items).await?;
        }

        let total_items = counts.total();
        info!(
            "Portfolio import: {total_items} total, {duplicates_skipped} duplicates, {} rejected",
            rejected.len()
        );
        Ok(PortfolioImportReport {
            counts,
            total_items,
            duplicates_skipped,
            rejected,
        })
    }

    pub async fn personal_info(&self) -> Result<PersonalInfo> {
        self.data.load_json(PERSONAL_INFO_KEY).await
    }

    /// Replaces the personal-info singleton wholesale.
    pub async fn save_personal_info(&self, info: &PersonalInfo) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.data.save_json(PERSONAL_INFO_KEY, info).await
    }

    pub async fn skills(&self) -> Result<Vec<SkillCategory>> {
        self.data.load_json(SKILLS_KEY).await
    }

    /// Replaces the whole skills sequence.
    pub async fn save_skills(&self, skills: &[SkillCategory]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.data.save_json(SKILLS_KEY, skills).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Category;
    use serde_json::json;

    async fn open_store() -> (tempfile::TempDir, CatalogStore) {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::open(dir.path()).await.unwrap();
        (dir, CatalogStore::new(data))
    }

    fn draft(title: &str, description: &str) -> ContentItemDraft {
        ContentItemDraft {
            title: title.to_string(),
            description: description.to_string(),
            technologies: vec!["Rust".to_string()],
            date_range: "2022 - 2023".to_string(),
            category: Category::Project,
            bullets: vec![],
        }
    }

    fn raw_item(title: &str) -> Value {
        json!({
            "title": title,
            "description": "desc",
            "date_range": "2021",
            "category": "project"
        })
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_nothing() {
        let (_dir, store) = open_store().await;
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_assigns_stable_id() {
        let (_dir, store) = open_store().await;
        let item = store.create(draft("Rocket Simulator", "v1")).await.unwrap();

        assert_eq!(item.id, derive_stable_id("rocket simulator"));
        assert_eq!(store.get(&item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_create_same_normalized_title_overwrites() {
        let (_dir, store) = open_store().await;
        let first = store.create(draft("Rocket Simulator", "v1")).await.unwrap();
        let mut second_draft = draft("  ROCKET simulator ", "v2");
        second_draft.technologies = vec![];
        let second = store.create(second_draft).await.unwrap();

        assert_eq!(first.id, second.id);
        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "v2");
        assert_eq!(items[0].title, "  ROCKET simulator ");
        assert!(items[0].technologies.is_empty(), "fields replaced, not merged");
    }

    #[tokio::test]
    async fn test_update_with_empty_patch_is_a_no_op() {
        let (_dir, store) = open_store().await;
        let item = store.create(draft("Compiler", "toy")).await.unwrap();

        let updated = store
            .update(&item.id, ContentItemPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            serde_json::to_vec(&updated).unwrap(),
            serde_json::to_vec(&item).unwrap()
        );
        assert_eq!(store.get(&item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let (_dir, store) = open_store().await;
        let item = store.create(draft("Compiler", "toy")).await.unwrap();

        let patch = ContentItemPatch {
            bullets: Some(vec!["Parsed 1M LOC/s".to_string()]),
            ..Default::default()
        };
        let updated = store.update(&item.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.description, "toy");
        assert_eq!(updated.bullets, vec!["Parsed 1M LOC/s".to_string()]);
        assert_eq!(updated.id, item.id, "update never re-derives the id");
    }

    #[tokio::test]
    async fn test_update_missing_id_changes_nothing() {
        let (_dir, store) = open_store().await;
        store.create(draft("Compiler", "toy")).await.unwrap();
        let before = store.list().await.unwrap();

        let patch = ContentItemPatch {
            title: Some("Other".to_string()),
            ..Default::default()
        };
        assert!(store.update("nope1234", patch).await.unwrap().is_none());
        assert_eq!(store.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let (_dir, store) = open_store().await;
        let item = store.create(draft("Compiler", "toy")).await.unwrap();

        assert!(store.delete(&item.id).await.unwrap());
        assert!(!store.delete(&item.id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_batch_keeps_same_titles_distinct() {
        let (_dir, store) = open_store().await;
        let report = store
            .import_batch(vec![raw_item("Shared Title"), raw_item("Shared Title")])
            .await
            .unwrap();

        assert_eq!(report.imported_count, 2);
        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_ne!(items[0].id, items[1].id);
    }

    #[tokio::test]
    async fn test_import_batch_skips_existing_ids_without_overwriting() {
        let (_dir, store) = open_store().await;
        let existing = store.create(draft("Compiler", "original")).await.unwrap();

        let mut clash = raw_item("Replacement");
        clash["id"] = json!(existing.id.clone());
        let mut fresh = raw_item("Fresh");
        fresh["id"] = json!("fresh001");
        let mut fresh_again = raw_item("Fresh again");
        fresh_again["id"] = json!("fresh001");

        let report = store
            .import_batch(vec![clash, fresh, fresh_again])
            .await
            .unwrap();

        assert_eq!(report.imported_count, 1);
        assert_eq!(report.duplicates_skipped, 2);
        assert_eq!(store.list().await.unwrap().len(), 2);
        assert_eq!(store.get(&existing.id).await.unwrap(), Some(existing));
    }

    #[tokio::test]
    async fn test_import_batch_skips_invalid_items() {
        let (_dir, store) = open_store().await;
        let report = store
            .import_batch(vec![
                raw_item("Good"),
                json!({"title": "No description", "category": "project"}),
                json!(42),
                json!({"title": "Bad category", "description": "d", "date_range": "x", "category": "hobby"}),
            ])
            .await
            .unwrap();

        assert_eq!(report.imported_count, 1);
        assert_eq!(report.rejected.len(), 3);
        assert_eq!(report.rejected[0].index, 1);
        assert!(report.rejected[1].id.is_none());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_portfolio_dedups_across_categories() {
        let (_dir, store) = open_store().await;
        let bundle: PortfolioBundle = serde_json::from_value(json!({
            "education": [{
                "title": "Acme Internship",
                "description": "d",
                "date_range": "2020"
            }],
            "experience": [{
                "title": "acme internship",
                "description": "d",
                "date_range": "2020"
            }]
        }))
        .unwrap();

        let report = store.import_portfolio(bundle).await.unwrap();

        assert_eq!(report.counts.education, 1);
        assert_eq!(report.counts.experience, 0);
        assert_eq!(report.duplicates_skipped, 1);
        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, Category::Education);
        assert_eq!(items[0].id, derive_stable_id("Acme Internship"));
    }

    #[tokio::test]
    async fn test_portfolio_converges_on_reimport() {
        let (_dir, store) = open_store().await;
        let payload = json!({
            "projects": [
                {"title": "Rocket Simulator", "description": "d", "date_range": "2023"},
                {"title": "Compiler", "description": "d", "date_range": "2022"}
            ]
        });

        let first = store
            .import_portfolio(serde_json::from_value(payload.clone()).unwrap())
            .await
            .unwrap();
        let second = store
            .import_portfolio(serde_json::from_value(payload).unwrap())
            .await
            .unwrap();

        assert_eq!(first.counts.projects, 2);
        assert_eq!(second.counts.projects, 0);
        assert_eq!(second.duplicates_skipped, 2);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_portfolio_counts_only_added_items() {
        let (_dir, store) = open_store().await;
        let bundle: PortfolioBundle = serde_json::from_value(json!({
            "certifications": [
                {"title": "CKA", "description": "k8s", "date_range": "2024"},
                {"title": "Missing date", "description": "d"},
                "not an object"
            ]
        }))
        .unwrap();

        let report = store.import_portfolio(bundle).await.unwrap();

        assert_eq!(report.counts.certifications, 1);
        assert_eq!(report.total_items, 1);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].section.as_deref(), Some("certifications"));
        assert_eq!(
            store.list().await.unwrap()[0].category,
            Category::Certification
        );
    }

    #[tokio::test]
    async fn test_portfolio_stamps_section_category() {
        let (_dir, store) = open_store().await;
        let bundle: PortfolioBundle = serde_json::from_value(json!({
            "projects": [{
                "title": "Mislabelled",
                "description": "d",
                "date_range": "2020",
                "category": "experience"
            }]
        }))
        .unwrap();

        store.import_portfolio(bundle).await.unwrap();
        assert_eq!(store.list().await.unwrap()[0].category, Category::Project);
    }

    #[tokio::test]
    async fn test_portfolio_replaces_singletons_when_present() {
        let (_dir, store) = open_store().await;
        store
            .save_skills(&[SkillCategory {
                category: "Old".to_string(),
                items: vec![],
            }])
            .await
            .unwrap();

        let bundle: PortfolioBundle = serde_json::from_value(json!({
            "personal_info": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "skills": [
                {"category": "Languages", "items": ["Rust", "Python"]},
                {"category": "Tools", "items": ["Git"]}
            ]
        }))
        .unwrap();
        let report = store.import_portfolio(bundle).await.unwrap();

        assert_eq!(report.counts.personal_info, 1);
        assert_eq!(report.counts.skills, 2);
        assert_eq!(report.total_items, 3);
        assert_eq!(
            store.personal_info().await.unwrap().name.as_deref(),
            Some("Ada Lovelace")
        );
        let skills = store.skills().await.unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].category, "Languages");
    }

    #[tokio::test]
    async fn test_portfolio_without_singletons_keeps_them() {
        let (_dir, store) = open_store().await;
        let info = PersonalInfo {
            name: Some("Ada".to_string()),
            ..Default::default()
        };
        store.save_personal_info(&info).await.unwrap();

        let bundle: PortfolioBundle =
            serde_json::from_value(json!({"personal_info": {}, "skills": []})).unwrap();
        let report = store.import_portfolio(bundle).await.unwrap();

        assert_eq!(report.total_items, 0);
        assert_eq!(store.personal_info().await.unwrap(), info);
    }

    #[tokio::test]
    async fn test_import_batch_keeps_numeric_ids_across_reimports() {
        let (_dir, store) = open_store().await;
        let mut item = raw_item("Telemetry Pipeline");
        item["id"] = json!(42);

        let first = store.import_batch(vec![item.clone()]).await.unwrap();
        let second = store.import_batch(vec![item]).await.unwrap();

        assert_eq!(first.imported_count, 1);
        assert_eq!(second.imported_count, 0);
        assert_eq!(second.duplicates_skipped, 1);
        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "42");
    }

    #[tokio::test]
    async fn test_import_batch_rejects_unusable_ids() {
        let (_dir, store) = open_store().await;
        let mut blank = raw_item("Blank Id");
        blank["id"] = json!("");
        let mut nested = raw_item("Nested Id");
        nested["id"] = json!({"value": 1});

        let report = store.import_batch(vec![blank, nested]).await.unwrap();

        assert_eq!(report.imported_count, 0);
        assert_eq!(report.rejected.len(), 2);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_portfolio_bad_skill_entry_does_not_sink_the_bundle() {
        let (_dir, store) = open_store().await;
        let bundle: PortfolioBundle = serde_json::from_value(json!({
            "skills": [
                {"category": "Langs", "items": null},
                {"items": ["orphan"]}
            ],
            "projects": [raw_item("Rocket Simulator")]
        }))
        .unwrap();

        let report = store.import_portfolio(bundle).await.unwrap();

        assert_eq!(report.counts.skills, 1);
        assert_eq!(report.counts.projects, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].section.as_deref(), Some("skills"));
        let skills = store.skills().await.unwrap();
        assert_eq!(skills[0].category, "Langs");
        assert!(skills[0].items.is_empty());
    }

    #[tokio::test]
    async fn test_personal_info_defaults_when_unsaved() {
        let (_dir, store) = open_store().await;
        assert!(store.personal_info().await.unwrap().is_blank());
        assert!(store.skills().await.unwrap().is_empty());
    }
}
