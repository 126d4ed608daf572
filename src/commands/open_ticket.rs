use crate::bot::Handler;
use crate::bot::helpers::components::{self, ephemeral};
use crate::commands::close_ticket::TicketChannel;
use crate::utils::config::GuildScope;
use crate::utils::countdown::discard_on_failure;
use crate::utils::permissions::{RoleDirectory, ticket_overwrites};
use crate::utils::reason::TicketReason;
use crate::utils::ticket::{TicketDraft, TicketError, TicketStatus};
use serenity::all::{
    ChannelId, ChannelType, ComponentInteraction, ComponentInteractionDataKind, Context,
    CreateChannel, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
    EditInteractionResponse, GuildId, Mentionable,
};

/// Handle a pick from the `ticket_reason` menu.
pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &ComponentInteraction,
) -> anyhow::Result<()> {
    let reason_id = match &interaction.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => {
            values.first().map(String::as_str).unwrap_or_default()
        }
        _ => "",
    };
    let reason = TicketReason::from_id(reason_id);

    let guilds = target_guilds(
        handler.config.guild_scope,
        interaction.guild_id,
        handler.config.ticket_guild,
        || context.cache.guilds(),
    );

    let user = &interaction.user;
    let drafts = match handler.draft_tickets(user.id, &user.name, reason, &guilds) {
        Ok(drafts) => drafts,
        Err(TicketError::Cooldown(active)) => {
            tracing::info!("[TICKET] {} ({}) is on cooldown", user.name, user.id);
            interaction
                .create_response(&context.http, ephemeral(active.to_string()))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Channel creation takes several API calls; acknowledge before the token expires.
    if let Err(e) = interaction
        .create_response(
            &context.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true)),
        )
        .await
    {
        handler.cooldowns.release(user.id.get());
        return Err(e.into());
    }

    let mut created = Vec::new();
    for draft in &drafts {
        match open_in_guild(handler, context, draft).await {
            Ok(channel_id) => created.push(channel_id),
            Err(e) => {
                tracing::error!(
                    "[TICKET] Failed to open ticket #{} in guild {}: {}",
                    draft.number,
                    draft.guild_id,
                    e
                );
            }
        }
    }

    let content = if created.is_empty() {
        handler.cooldowns.release(user.id.get());
        "Sorry, your ticket could not be created. Please contact a staff member.".to_string()
    } else {
        let links: Vec<String> = created.iter().map(|id| id.mention().to_string()).collect();
        format!("Your ticket has been created: {}", links.join(", "))
    };

    interaction
        .edit_response(&context.http, EditInteractionResponse::new().content(content))
        .await?;

    Ok(())
}

/// Guilds a new ticket is opened in.
pub fn target_guilds(
    scope: GuildScope,
    interaction_guild: Option<GuildId>,
    configured_guild: Option<GuildId>,
    cached_guilds: impl FnOnce() -> Vec<GuildId>,
) -> Vec<GuildId> {
    match scope {
        GuildScope::Interaction => interaction_guild.or(configured_guild).into_iter().collect(),
        GuildScope::AllGuilds => cached_guilds(),
    }
}

async fn open_in_guild(
    handler: &Handler,
    context: &Context,
    draft: &TicketDraft,
) -> anyhow::Result<ChannelId> {
    let guild_id = draft.guild_id;
    let staff = &handler.config.staff;

    let roles = guild_id.roles(&context.http).await?;
    let directory = RoleDirectory::from_guild(guild_id, &roles);
    let owner = guild_id.to_partial_guild(&context.http).await?.owner_id;
    let overwrites = ticket_overwrites(&directory, staff, owner, draft.creator_id)?;
    let helper = directory.helper(staff)?;

    let category = find_or_create_category(context, guild_id, &handler.config.category_name).await?;

    let channel = guild_id
        .create_channel(
            &context.http,
            CreateChannel::new(draft.channel_name())
                .kind(ChannelType::Text)
                .category(category)
                .permissions(overwrites),
        )
        .await?;

    let ticket_channel = TicketChannel::new(context.http.clone(), channel.id);
    let setup = discard_on_failure(&ticket_channel, async {
        handler.database.insert_ticket(channel.id.get(), draft).await?;

        channel
            .id
            .send_message(
                &context.http,
                CreateMessage::new()
                    .content(format!("{} a new ticket needs attention!", helper.mention()))
                    .embed(draft.intro_embed())
                    .components(vec![components::ticket_actions_row()]),
            )
            .await?;
        Ok::<(), anyhow::Error>(())
    })
    .await;

    if let Err(e) = setup {
        // The channel is gone; keep the store from counting it as open.
        if let Err(db_err) = handler
            .database
            .compare_and_set_status(channel.id.get(), TicketStatus::Created, TicketStatus::Deleted, None)
            .await
        {
            tracing::warn!("[TICKET] Failed to retire ticket #{}: {}", draft.number, db_err);
        }
        return Err(e);
    }

    if let Err(e) = handler.ticket_log.append(&draft.log_line(&channel.name)).await {
        tracing::warn!("[TICKET] Failed to write ticket log: {}", e);
    }

    tracing::info!(
        "[TICKET] Opened ticket #{} ({}) for {} in guild {}",
        draft.number,
        channel.name,
        draft.creator_id,
        guild_id
    );

    Ok(channel.id)
}

async fn find_or_create_category(
    context: &Context,
    guild_id: GuildId,
    name: &str,
) -> anyhow::Result<ChannelId> {
    let channels = guild_id.channels(&context.http).await?;
    if let Some(category) = channels
        .values()
        .find(|channel| channel.kind == ChannelType::Category && channel.name == name)
    {
        return Ok(category.id);
    }

    tracing::info!("[TICKET] Creating `{}` category in guild {}", name, guild_id);
    let category = guild_id
        .create_channel(
            &context.http,
            CreateChannel::new(name).kind(ChannelType::Category),
        )
        .await?;

    Ok(category.id)
}
