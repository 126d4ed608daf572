use crate::bot::Handler;
use crate::bot::helpers::access;
use crate::bot::helpers::components::ephemeral;
use crate::bot::routes::{InteractionKind, Route};
use crate::commands::{self, error};
use anyhow::Result;
use serenity::all::{
    ComponentInteraction, ComponentInteractionDataKind, Context, ModalInteraction,
};

/// Route component interactions (menu picks and button clicks) to their handlers
pub async fn route_component_interaction(
    handler: &Handler,
    context: &Context,
    component: &ComponentInteraction,
) -> Result<()> {
    let custom_id = component.data.custom_id.as_str();
    let kind = match component.data.kind {
        ComponentInteractionDataKind::Button => InteractionKind::Button,
        _ => InteractionKind::SelectMenu,
    };

    let Some(route) = Route::resolve(kind, custom_id) else {
        tracing::debug!("[ROUTER] Unhandled component interaction: {}", custom_id);
        component
            .create_response(&context.http, ephemeral(error::UNKNOWN_INTERACTION))
            .await?;
        return Ok(());
    };

    let member_roles = component
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default();

    if !access::authorize(
        context,
        &handler.config.staff,
        route.access(),
        component.guild_id,
        component.user.id,
        &member_roles,
    )
    .await?
    {
        tracing::info!("[ROUTER] {} denied {}", component.user.id, custom_id);
        component
            .create_response(&context.http, ephemeral(error::ACCESS_DENIED))
            .await?;
        return Ok(());
    }

    match route {
        Route::OpenTicket => commands::open_ticket::run(handler, context, component).await,
        Route::ClaimTicket => commands::claim_ticket::run(handler, context, component).await,
        Route::ResolveTicket => commands::resolve_ticket::run(handler, context, component).await,
        Route::CloseTicket => commands::close_ticket::run(handler, context, component).await,
        Route::AdminMenu => commands::admin::handle_menu(handler, context, component).await,
        other => {
            tracing::warn!("[ROUTER] {:?} is not a component route", other);
            Ok(())
        }
    }
}

/// Route modal submissions to their handlers
pub async fn route_modal_interaction(
    handler: &Handler,
    context: &Context,
    modal: &ModalInteraction,
) -> Result<()> {
    let custom_id = modal.data.custom_id.as_str();

    let Some(route) = Route::resolve(InteractionKind::Modal, custom_id) else {
        tracing::debug!("[ROUTER] Unhandled modal submission: {}", custom_id);
        modal
            .create_response(&context.http, ephemeral(error::UNKNOWN_INTERACTION))
            .await?;
        return Ok(());
    };

    let member_roles = modal
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default();

    if !access::authorize(
        context,
        &handler.config.staff,
        route.access(),
        modal.guild_id,
        modal.user.id,
        &member_roles,
    )
    .await?
    {
        tracing::info!("[ROUTER] {} denied {}", modal.user.id, custom_id);
        modal
            .create_response(&context.http, ephemeral(error::ACCESS_DENIED))
            .await?;
        return Ok(());
    }

    match route {
        Route::ResolveModal => commands::resolve_ticket::handle_modal(handler, context, modal).await,
        Route::SendMessageModal => {
            commands::send_message::handle_modal(handler, context, modal).await
        }
        other => {
            tracing::warn!("[ROUTER] {:?} is not a modal route", other);
            Ok(())
        }
    }
}
