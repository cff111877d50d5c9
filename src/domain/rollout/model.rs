use serde::Serialize;

/// Lock keys live next to the tag records, prefixed so they never collide.
pub const LOCK_KEY_PREFIX: &str = "lock:";

/// A deployable unit as seen by the detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub namespace: String,
    pub name: String,
    pub current_tag: String,
    /// Label selector matching the workload's replicas, `k=v,k2=v2`.
    pub selector: String,
}

/// Readiness of one replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaStatus {
    pub name: String,
    pub ready: bool,
    /// Tag the replica's container is running, when it could be parsed.
    pub tag: Option<String>,
}

impl ReplicaStatus {
    pub fn is_ready_for(&self, tag: &str) -> bool {
        self.ready && self.tag.as_deref() == Some(tag)
    }
}

/// Result of comparing a workload's running tag with its stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagClassification {
    /// First time this workload is seen; the record was seeded.
    Baseline,
    Unchanged,
    Changed { previous: String },
}

/// Key of a workload's tag record. Peers read the same key.
pub fn tag_record_key(workload: &str) -> String {
    workload.to_string()
}

pub fn lock_key(workload: &str) -> String {
    format!("{}{}", LOCK_KEY_PREFIX, workload)
}

/// Extracts the tag from an image reference.
///
/// `registry:5000/team/app:v2@sha256:..` yields `v2`; a reference without a tag yields `None`.
pub fn parse_image_tag(image: &str) -> Option<String> {
    let without_digest = image.split('@').next().unwrap_or(image);
    let last_segment_start = without_digest.rfind('/').map(|i| i + 1).unwrap_or(0);
    let last_segment = &without_digest[last_segment_start..];

    last_segment
        .rsplit_once(':')
        .map(|(_, tag)| tag)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_from_image_references() {
        assert_eq!(parse_image_tag("nginx:1.25").as_deref(), Some("1.25"));
        assert_eq!(
            parse_image_tag("registry.local:5000/team/app:v2").as_deref(),
            Some("v2")
        );
        assert_eq!(
            parse_image_tag("team/app:v3@sha256:abcdef").as_deref(),
            Some("v3")
        );
        assert_eq!(parse_image_tag("registry.local:5000/team/app"), None);
        assert_eq!(parse_image_tag("app:"), None);
    }

    #[test]
    fn replica_on_old_tag_is_not_ready_for_new_one() {
        let replica = ReplicaStatus {
            name: "svc-a-1".into(),
            ready: true,
            tag: Some("v1".into()),
        };
        assert!(!replica.is_ready_for("v2"));
        assert!(replica.is_ready_for("v1"));

        let untagged = ReplicaStatus { tag: None, ..replica };
        assert!(!untagged.is_ready_for("v1"));
    }

    #[test]
    fn lock_keys_are_prefixed() {
        assert_eq!(lock_key("svc-a"), "lock:svc-a");
        assert_eq!(tag_record_key("svc-a"), "svc-a");
    }
}
