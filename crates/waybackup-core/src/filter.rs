//! Partition archived URLs into per-extension buckets by suffix.

/// URLs whose text ends with one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub extension: String,
    pub urls: Vec<String>,
}

/// Buckets in extension-list order. Each requested extension has a bucket,
/// possibly empty.
///
/// Buckets are not exclusive: a URL ending in `.tar.gz` lands in both a
/// `.tar.gz` and a `.gz` bucket when both are requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketMap {
    buckets: Vec<Bucket>,
}

/// Case-insensitive suffix test.
pub fn matches_extension(url: &str, extension: &str) -> bool {
    url.to_lowercase().ends_with(&extension.to_lowercase())
}

/// The name an extension is filed under: surrounding dots trimmed.
pub fn extension_token(extension: &str) -> &str {
    extension.trim_matches('.')
}

fn same_token(a: &str, b: &str) -> bool {
    extension_token(a).to_lowercase() == extension_token(b).to_lowercase()
}

impl BucketMap {
    /// One empty bucket per distinct extension, first occurrence order.
    ///
    /// Extensions that differ only in surrounding dots or case (`pdf`,
    /// `.pdf`, `.PDF`) share a file name, so only the first one is kept.
    pub fn with_extensions<I, E>(extensions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        let mut buckets: Vec<Bucket> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref();
            if buckets.iter().any(|b| same_token(&b.extension, ext)) {
                continue;
            }
            buckets.push(Bucket {
                extension: ext.to_string(),
                urls: Vec::new(),
            });
        }
        Self { buckets }
    }

    /// Add `url` to every bucket whose extension it ends with.
    pub fn insert(&mut self, url: &str) {
        for bucket in &mut self.buckets {
            if matches_extension(url, &bucket.extension) {
                bucket.urls.push(url.to_string());
            }
        }
    }

    /// Build the map for `extensions` from a batch of URLs.
    pub fn partition<I, S, E>(urls: I, extensions: &[E]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: AsRef<str>,
    {
        let mut map = Self::with_extensions(extensions);
        for url in urls {
            map.insert(url.as_ref());
        }
        map
    }

    /// True when no extensions were requested at all.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Matched entries across all buckets (a URL in two buckets counts twice).
    pub fn total_matches(&self) -> usize {
        self.buckets.iter().map(|b| b.urls.len()).sum()
    }

    pub fn get(&self, extension: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|b| b.extension == extension)
            .map(|b| b.urls.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }
}

impl<'a> IntoIterator for &'a BucketMap {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}
