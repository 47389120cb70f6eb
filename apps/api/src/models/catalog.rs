use serde::{Deserialize, Deserializer, Serialize};

/// Which résumé section a content item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Project,
    Experience,
    Education,
    Certification,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Experience => "experience",
            Category::Education => "education",
            Category::Certification => "certification",
        }
    }
}

/// A reusable unit of résumé content. `id` is unique within the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    pub date_range: String,
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

/// A content item as entered by the user, before an id is assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItemDraft {
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    pub date_range: String,
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

impl ContentItemDraft {
    pub fn into_item(self, id: String) -> ContentItem {
        ContentItem {
            id,
            title: self.title,
            description: self.description,
            technologies: self.technologies,
            date_range: self.date_range,
            category: self.category,
            bullets: self.bullets,
        }
    }
}

/// Partial update: only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub date_range: Option<String>,
    pub category: Option<Category>,
    pub bullets: Option<Vec<String>>,
}

impl ContentItemPatch {
    pub fn apply_to(self, item: &mut ContentItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(technologies) = self.technologies {
            item.technologies = technologies;
        }
        if let Some(date_range) = self.date_range {
            item.date_range = date_range;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(bullets) = self.bullets {
            item.bullets = bullets;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl PersonalInfo {
    /// True when no field carries any text.
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.title,
            &self.email,
            &self.phone,
            &self.location,
            &self.bio,
            &self.website,
            &self.github,
            &self.linkedin,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
