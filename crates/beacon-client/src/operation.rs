use std::fmt;

/// Which configured key goes into the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// REST API key: read/list access to apps and devices.
    RestApiKey,
    /// User auth key: sends, cancels and every mutation.
    UserAuthKey,
}

/// Failure family an operation reports under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Send,
    Cancel,
    Query,
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SendToAll,
    SendToPlayers,
    SendToExternalUserIds,
    CancelNotification,
    TrackOpen,
    ListApps,
    GetApp,
    CreateApp,
    UpdateApp,
    ListDevices,
    AddDevice,
    UpdateDevice,
}

impl Operation {
    pub const ALL: [Self; 12] = [
        Self::SendToAll,
        Self::SendToPlayers,
        Self::SendToExternalUserIds,
        Self::CancelNotification,
        Self::TrackOpen,
        Self::ListApps,
        Self::GetApp,
        Self::CreateApp,
        Self::UpdateApp,
        Self::ListDevices,
        Self::AddDevice,
        Self::UpdateDevice,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SendToAll => "send_to_all",
            Self::SendToPlayers => "send_to_players",
            Self::SendToExternalUserIds => "send_to_external_user_ids",
            Self::CancelNotification => "cancel_notification",
            Self::TrackOpen => "track_open",
            Self::ListApps => "list_apps",
            Self::GetApp => "get_app",
            Self::CreateApp => "create_app",
            Self::UpdateApp => "update_app",
            Self::ListDevices => "list_devices",
            Self::AddDevice => "add_device",
            Self::UpdateDevice => "update_device",
        }
    }

    /// The vendor rejects a call signed with the wrong key as unauthorized,
    /// so this table must match its documented key scopes.
    #[must_use]
    pub fn credential(self) -> Credential {
        match self {
            Self::ListApps | Self::GetApp | Self::ListDevices => Credential::RestApiKey,
            Self::SendToAll
            | Self::SendToPlayers
            | Self::SendToExternalUserIds
            | Self::CancelNotification
            | Self::TrackOpen
            | Self::CreateApp
            | Self::UpdateApp
            | Self::AddDevice
            | Self::UpdateDevice => Credential::UserAuthKey,
        }
    }

    #[must_use]
    pub fn failure_kind(self) -> FailureKind {
        match self {
            Self::SendToAll | Self::SendToPlayers | Self::SendToExternalUserIds => {
                FailureKind::Send
            }
            Self::CancelNotification => FailureKind::Cancel,
            Self::ListApps | Self::GetApp | Self::ListDevices => FailureKind::Query,
            Self::CreateApp | Self::AddDevice => FailureKind::Create,
            Self::UpdateApp | Self::UpdateDevice | Self::TrackOpen => FailureKind::Update,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_operations_use_rest_api_key() {
        for op in [Operation::ListApps, Operation::GetApp, Operation::ListDevices] {
            assert_eq!(op.credential(), Credential::RestApiKey, "{op}");
        }
    }

    #[test]
    fn mutating_operations_use_user_auth_key() {
        let readers = [Operation::ListApps, Operation::GetApp, Operation::ListDevices];
        for op in Operation::ALL.into_iter().filter(|op| !readers.contains(op)) {
            assert_eq!(op.credential(), Credential::UserAuthKey, "{op}");
        }
    }

    #[test]
    fn failure_kinds_match_operation_families() {
        assert_eq!(Operation::SendToAll.failure_kind(), FailureKind::Send);
        assert_eq!(
            Operation::SendToExternalUserIds.failure_kind(),
            FailureKind::Send
        );
        assert_eq!(
            Operation::CancelNotification.failure_kind(),
            FailureKind::Cancel
        );
        assert_eq!(Operation::ListDevices.failure_kind(), FailureKind::Query);
        assert_eq!(Operation::AddDevice.failure_kind(), FailureKind::Create);
        assert_eq!(Operation::TrackOpen.failure_kind(), FailureKind::Update);
    }

    #[test]
    fn display_uses_snake_case_name() {
        assert_eq!(Operation::CancelNotification.to_string(), "cancel_notification");
    }
}
