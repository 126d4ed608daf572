use crate::bot::routes::Access;
use crate::utils::config::StaffRoles;
use crate::utils::permissions::RoleDirectory;
use anyhow::Result;
use serenity::all::{Context, GuildId, RoleId, UserId};

/// Pure authorization decision for a guild member.
pub fn is_authorized(
    access: Access,
    directory: &RoleDirectory,
    staff: &StaffRoles,
    member_roles: &[RoleId],
    user: UserId,
    owner: UserId,
) -> bool {
    let holds = |name: &str| {
        directory
            .find(name)
            .is_some_and(|role| member_roles.contains(&role))
    };

    match access {
        Access::Anyone => true,
        Access::Staff => holds(&staff.helper) || holds(&staff.moderator),
        Access::Admin => {
            user == owner
                || holds(&staff.moderator)
                || staff.managers.iter().any(|manager| holds(manager))
        }
    }
}

/// Fetch the guild's current roles and owner and decide whether the invoker
/// may use a route. Privileged routes are never available outside a guild.
pub async fn authorize(
    context: &Context,
    staff: &StaffRoles,
    access: Access,
    guild_id: Option<GuildId>,
    user: UserId,
    member_roles: &[RoleId],
) -> Result<bool> {
    if access == Access::Anyone {
        return Ok(true);
    }
    let Some(guild_id) = guild_id else {
        return Ok(false);
    };

    let roles = guild_id.roles(&context.http).await?;
    let owner = guild_id.to_partial_guild(&context.http).await?.owner_id;
    let directory = RoleDirectory::from_guild(guild_id, &roles);

    Ok(is_authorized(
        access,
        &directory,
        staff,
        member_roles,
        user,
        owner,
    ))
}
