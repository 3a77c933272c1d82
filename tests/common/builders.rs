use media_lifecycle::domain::entities::{BinaryContent, Category, Media, MediaId};

pub struct MediaBuilder {
    id: Option<MediaId>,
    provider: String,
    context: String,
    name: Option<String>,
    content: Option<BinaryContent>,
    category: Option<Category>,
}

impl MediaBuilder {
    pub fn new(provider: &str) -> Self {
        Self {
            id: None,
            provider: provider.to_string(),
            context: "default".to_string(),
            name: None,
            content: None,
            category: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(MediaId::new(id));
        self
    }

    pub fn in_context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_content(mut self, filename: &str, bytes: &[u8]) -> Self {
        self.content = Some(BinaryContent::new(filename, bytes.to_vec()));
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn build(self) -> Media {
        let mut media = Media::new(self.provider, self.context);
        if let Some(id) = self.id {
            media.id = id;
        }
        media.name = self.name;
        media.binary_content = self.content;
        media.category = self.category;
        media
    }
}
