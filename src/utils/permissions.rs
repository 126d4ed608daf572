use crate::utils::config::StaffRoles;
use crate::utils::ticket::TicketError;
use serenity::all::{
    GuildId, PermissionOverwrite, PermissionOverwriteType, Permissions, Role, RoleId, UserId,
};
use std::collections::HashMap;

/// What ticket participants may do inside the channel.
pub const PARTICIPANT: Permissions = Permissions::VIEW_CHANNEL
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::ATTACH_FILES);

/// Role lookup for a single guild, rebuilt from the guild's current roles.
#[derive(Debug, Clone)]
pub struct RoleDirectory {
    everyone: RoleId,
    roles: Vec<(String, RoleId)>,
}

impl RoleDirectory {
    pub fn new<N: Into<String>>(everyone: RoleId, roles: impl IntoIterator<Item = (N, RoleId)>) -> Self {
        Self {
            everyone,
            roles: roles
                .into_iter()
                .map(|(name, id)| (name.into(), id))
                .collect(),
        }
    }

    pub fn from_guild(guild_id: GuildId, roles: &HashMap<RoleId, Role>) -> Self {
        Self::new(
            guild_id.everyone_role(),
            roles.values().map(|role| (role.name.clone(), role.id)),
        )
    }

    pub fn everyone(&self) -> RoleId {
        self.everyone
    }

    pub fn find(&self, name: &str) -> Option<RoleId> {
        self.roles
            .iter()
            .find(|(role_name, _)| role_name == name)
            .map(|(_, id)| *id)
    }

    pub fn helper(&self, staff: &StaffRoles) -> Result<RoleId, TicketError> {
        self.find(&staff.helper)
            .ok_or_else(|| TicketError::MissingRole(staff.helper.clone()))
    }
}

fn allow_role(role: RoleId) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: PARTICIPANT,
        deny: Permissions::empty(),
        kind: PermissionOverwriteType::Role(role),
    }
}

fn allow_member(user: UserId) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: PARTICIPANT,
        deny: Permissions::empty(),
        kind: PermissionOverwriteType::Member(user),
    }
}

/// Overwrites for a freshly created ticket channel.
///
/// Entries keep insertion order and are never de-duplicated: a requester who
/// is also the guild owner shows up twice.
pub fn ticket_overwrites(
    directory: &RoleDirectory,
    staff: &StaffRoles,
    owner: UserId,
    requester: UserId,
) -> Result<Vec<PermissionOverwrite>, TicketError> {
    let helper = directory.helper(staff)?;

    let mut plan = vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(directory.everyone()),
        },
        allow_role(helper),
        allow_member(requester),
    ];

    if let Some(moderator) = directory.find(&staff.moderator) {
        plan.push(allow_role(moderator));
    }
    for manager in &staff.managers {
        if let Some(role) = directory.find(manager) {
            plan.push(allow_role(role));
        }
    }
    plan.push(allow_member(owner));

    Ok(plan)
}

/// Overwrites applied when a staff member claims a ticket: the claimer can
/// talk, the rest of the helper team can only read.
pub fn claim_overwrites(helper: RoleId, claimer: UserId) -> [PermissionOverwrite; 2] {
    [
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(claimer),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL,
            deny: Permissions::SEND_MESSAGES,
            kind: PermissionOverwriteType::Role(helper),
        },
    ]
}
