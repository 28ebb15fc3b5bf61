//! Built-in avatar list used when the catalog cannot be fetched.

use parley_client::AvatarDescriptor;

/// Avatars offered when the backend catalog is unavailable.
pub fn fallback_avatars() -> Vec<AvatarDescriptor> {
    vec![
        AvatarDescriptor::new("avatar_1001", "Interviewer 1"),
        AvatarDescriptor::new("avatar_1002", "Interviewer 2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_ids() {
        let ids: Vec<String> = fallback_avatars().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["avatar_1001", "avatar_1002"]);
    }
}
