// SPDX-License-Identifier: MPL-2.0
//! Update logic for the application.
//!
//! Component messages arrive here as events; the handlers turn them into
//! mode switches and server requests. Every fetch takes a ticket from the
//! fence of the region it renders into, and its response is dropped when a
//! newer request for that region was issued in the meantime.

use super::session::SearchSession;
use super::Message;
use crate::config::{self, Config};
use crate::error::Error;
use crate::fragment::{Fragment, FragmentAction, HelpDocument, ImageCache};
use crate::i18n::fluent::I18n;
use crate::navigation::{Mode, Page, ResultContainer, Source};
use crate::search::page_globals::PageGlobals;
use crate::search::response::SearchResponse;
use crate::search::sequence::{RequestFence, Ticket};
use crate::search::validation::{
    is_empty_submission, validate_image, AllowedExtensions, PickedFile, SelectedImage,
    UploadLimits,
};
use crate::search::SearchClient;
use crate::ui::fragment_view;
use crate::ui::help;
use crate::ui::input_form;
use crate::ui::modal::Modal;
use crate::ui::navbar;
use crate::ui::notifications::{self, Notification};
use crate::ui::results;
use iced::Task;
use std::path::PathBuf;
use unic_langid::LanguageIdentifier;

/// Context for update operations containing mutable references to app state.
pub struct UpdateContext<'a> {
    pub i18n: &'a mut I18n,
    pub config: &'a mut Config,
    pub client: &'a Option<SearchClient>,
    pub limits: &'a mut UploadLimits,
    pub session: &'a mut SearchSession,
    pub help: &'a mut help::State,
    pub help_fence: &'a mut RequestFence,
    pub images: &'a mut ImageCache,
    pub modal: &'a mut Option<Modal>,
    pub menu_open: &'a mut bool,
    pub notifications: &'a mut notifications::Manager,
}

/// Client for a new request. Without one (unusable server URL) the user
/// gets an error toast and nothing is sent.
fn server(ctx: &mut UpdateContext<'_>) -> Option<SearchClient> {
    match ctx.client {
        Some(client) => Some(client.clone()),
        None => {
            ctx.notifications
                .push(Notification::error("error-server-url"));
            None
        }
    }
}

// =============================================================================
// Component messages
// =============================================================================

/// Handles navbar messages.
pub fn handle_navbar_message(
    ctx: &mut UpdateContext<'_>,
    message: navbar::Message,
) -> Task<Message> {
    match navbar::update(message, ctx.menu_open) {
        navbar::Event::None => Task::none(),
        navbar::Event::NavigateHome => navigate_home(ctx),
        // Breadcrumbs revisit a container without refetching it
        navbar::Event::NavigateResults => {
            ctx.session.navigation.switch_mode(Mode::ViewResults, None);
            Task::none()
        }
        navbar::Event::NavigateGroup => {
            ctx.session.navigation.switch_mode(Mode::ViewGroup, None);
            Task::none()
        }
        navbar::Event::OpenHelp => load_help(ctx),
        navbar::Event::CloseHelp => {
            ctx.session.navigation.show_page(Page::Index);
            Task::none()
        }
        navbar::Event::SelectLanguage(locale) => select_language(ctx, locale),
    }
}

/// Handles search form messages.
pub fn handle_input_form_message(
    ctx: &mut UpdateContext<'_>,
    message: input_form::Message,
) -> Task<Message> {
    let max_chars = ctx.limits.max_chars_text_filter;
    let has_image = ctx.session.has_image();

    match input_form::update(&mut ctx.session.form, message, max_chars, has_image) {
        input_form::Event::None => Task::none(),
        input_form::Event::FiltersChanged => {
            // Checkboxes stay live in the result views and re-run the search
            let mode = ctx.session.navigation.mode();
            if mode.is_input() || is_empty_submission(ctx.session.form.text(), has_image) {
                Task::none()
            } else {
                submit_search(ctx)
            }
        }
        input_form::Event::PickImage => open_image_dialog(&ctx.limits.allowed_extensions),
        input_form::Event::RemoveImage => {
            ctx.session.clear_image();
            Task::none()
        }
        input_form::Event::Submit => handle_submit(ctx),
        input_form::Event::ClearQuery => navigate_home(ctx),
    }
}

/// Handles messages from one of the result containers.
pub fn handle_results_message(
    ctx: &mut UpdateContext<'_>,
    container: ResultContainer,
    message: fragment_view::Message,
) -> Task<Message> {
    match results::update(ctx.session.panels.get_mut(container), message) {
        results::Event::None => Task::none(),
        results::Event::Action(action) => handle_fragment_action(ctx, action),
    }
}

/// Handles help screen messages.
pub fn handle_help_message(ctx: &mut UpdateContext<'_>, message: help::Message) -> Task<Message> {
    match help::update(ctx.help, message) {
        help::Event::None => Task::none(),
        help::Event::Action(action) => handle_fragment_action(ctx, action),
    }
}

/// Dispatches a page function called from a fragment link.
pub fn handle_fragment_action(
    ctx: &mut UpdateContext<'_>,
    action: FragmentAction,
) -> Task<Message> {
    tracing::debug!(?action, "fragment action");
    match action {
        FragmentAction::RetrieveResults { page } => retrieve_results(ctx, page),
        FragmentAction::GroupData { group, page } => get_group_data(ctx, group, page),
        FragmentAction::ItemData {
            group,
            item,
            source,
        } => get_item_data(ctx, group, item, source),
        FragmentAction::GoBack => {
            ctx.session.navigation.go_back_from_item();
            Task::none()
        }
        FragmentAction::LoadHelp => load_help(ctx),
        FragmentAction::NavigateHome => navigate_home(ctx),
    }
}

/// Closes the modal first, then the language menu.
pub fn handle_escape(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if ctx.modal.take().is_none() {
        *ctx.menu_open = false;
    }
    Task::none()
}

// =============================================================================
// Navigation and result fetches
// =============================================================================

/// Resets the whole search and returns to the empty input form.
pub fn navigate_home(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    tracing::debug!("navigating home");
    ctx.session.reset();
    ctx.help.begin_loading();
    ctx.help_fence.invalidate();
    *ctx.modal = None;
    *ctx.menu_open = false;
    ctx.images.clear_failures();
    ctx.notifications.clear_server_errors();
    Task::none()
}

/// Submit button or Enter in the text input.
pub fn handle_submit(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if is_empty_submission(ctx.session.form.text(), ctx.session.has_image()) {
        tracing::debug!("empty submission blocked");
        *ctx.modal = Some(Modal::NoPhotoText);
        return Task::none();
    }
    submit_search(ctx)
}

/// Posts the form and shows the loader in the results container.
fn submit_search(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let Some(client) = server(ctx) else {
        return Task::none();
    };

    ctx.session.navigation.switch_mode(Mode::ViewResults, None);
    let ticket = ctx
        .session
        .panels
        .get_mut(ResultContainer::Results)
        .begin_request();
    let submission = ctx.session.form.submission();
    let image = ctx
        .session
        .image
        .as_ref()
        .map(|attached| attached.file.clone());

    tracing::info!(has_image = image.is_some(), "submitting search");
    Task::perform(
        async move { client.post_search(submission, image).await },
        move |result| Message::SearchPosted { ticket, result },
    )
}

/// Handles the JSON answer of the search POST.
pub fn handle_search_posted(
    ctx: &mut UpdateContext<'_>,
    ticket: Ticket,
    result: Result<SearchResponse, Error>,
) -> Task<Message> {
    let panel = ctx.session.panels.get_mut(ResultContainer::Results);
    if !panel.accepts(ticket) {
        tracing::debug!(ticket = ticket.value(), "dropping stale search response");
        return Task::none();
    }

    match result {
        Ok(SearchResponse::Errors { errors }) => {
            tracing::info!(count = errors.len(), "search rejected by server");
            panel.show(Fragment::from_errors(errors));
            Task::none()
        }
        Ok(SearchResponse::Results { results_id }) => {
            tracing::debug!(%results_id, "search accepted");
            ctx.session.results_id = Some(results_id);
            retrieve_results(ctx, 1)
        }
        Err(err) => report_failure(ctx, ResultContainer::Results, &err),
    }
}

/// One page of the results list.
pub fn retrieve_results(ctx: &mut UpdateContext<'_>, page: u32) -> Task<Message> {
    let Some(client) = server(ctx) else {
        return Task::none();
    };

    ctx.session.navigation.switch_mode(Mode::ViewResults, None);
    let query = ctx
        .session
        .form
        .results_query(ctx.session.results_id.as_deref(), page);
    let ticket = ctx
        .session
        .panels
        .get_mut(ResultContainer::Results)
        .begin_request();

    Task::perform(
        async move { client.fetch_results(query).await },
        move |result| Message::FragmentLoaded {
            container: ResultContainer::Results,
            ticket,
            result,
        },
    )
}

/// One page of a result group.
pub fn get_group_data(ctx: &mut UpdateContext<'_>, group: String, page: u32) -> Task<Message> {
    let Some(client) = server(ctx) else {
        return Task::none();
    };

    ctx.session.navigation.switch_mode(Mode::ViewGroup, None);
    let query = ctx
        .session
        .form
        .results_query(ctx.session.results_id.as_deref(), page);
    let ticket = ctx
        .session
        .panels
        .get_mut(ResultContainer::Group)
        .begin_request();

    Task::perform(
        async move { client.fetch_group(group, query).await },
        move |result| Message::FragmentLoaded {
            container: ResultContainer::Group,
            ticket,
            result,
        },
    )
}

/// A single item; `source` decides where "back" leads.
pub fn get_item_data(
    ctx: &mut UpdateContext<'_>,
    group: String,
    item: String,
    source: Source,
) -> Task<Message> {
    let Some(client) = server(ctx) else {
        return Task::none();
    };

    ctx.session.navigation.set_return_to(source);
    ctx.session.navigation.switch_mode(Mode::ViewItem, Some(source));
    let ticket = ctx
        .session
        .panels
        .get_mut(ResultContainer::Item)
        .begin_request();

    Task::perform(
        async move { client.fetch_item(group, item).await },
        move |result| Message::FragmentLoaded {
            container: ResultContainer::Item,
            ticket,
            result,
        },
    )
}

/// Installs a fragment in its container unless a newer request exists.
pub fn handle_fragment_loaded(
    ctx: &mut UpdateContext<'_>,
    container: ResultContainer,
    ticket: Ticket,
    result: Result<String, Error>,
) -> Task<Message> {
    let panel = ctx.session.panels.get_mut(container);
    if !panel.accepts(ticket) {
        tracing::debug!(?container, ticket = ticket.value(), "dropping stale fragment");
        return Task::none();
    }

    match result {
        Ok(html) => {
            let fragment = Fragment::parse(&html);
            let sources = fragment.image_sources();
            panel.show(fragment);
            ctx.notifications.clear_server_errors();
            fetch_images(ctx, &sources)
        }
        Err(err) => report_failure(ctx, container, &err),
    }
}

/// Error toast plus an error placeholder in the container.
fn report_failure(
    ctx: &mut UpdateContext<'_>,
    container: ResultContainer,
    err: &Error,
) -> Task<Message> {
    tracing::warn!(?container, error = %err, "request failed");
    ctx.session.panels.get_mut(container).fail(err.i18n_key());
    ctx.notifications.push(Notification::from_error(err));
    Task::none()
}

// =============================================================================
// Help page
// =============================================================================

/// Shows the help page and fetches a fresh copy of it.
pub fn load_help(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let Some(client) = server(ctx) else {
        return Task::none();
    };

    ctx.session.navigation.show_page(Page::Help);
    ctx.help.begin_loading();
    let ticket = ctx.help_fence.issue();

    Task::perform(async move { client.fetch_help().await }, move |result| {
        Message::HelpLoaded { ticket, result }
    })
}

pub fn handle_help_loaded(
    ctx: &mut UpdateContext<'_>,
    ticket: Ticket,
    result: Result<String, Error>,
) -> Task<Message> {
    if !ctx.help_fence.accept(ticket) {
        tracing::debug!(ticket = ticket.value(), "dropping stale help page");
        return Task::none();
    }

    match result {
        Ok(html) => {
            let document = HelpDocument::parse(&html);
            let sources = document.image_sources();
            ctx.help.load(document);
            fetch_images(ctx, &sources)
        }
        Err(err) => {
            tracing::warn!(error = %err, "help page failed");
            ctx.help.fail(err.i18n_key());
            ctx.notifications.push(Notification::from_error(&err));
            Task::none()
        }
    }
}

// =============================================================================
// Fragment images
// =============================================================================

/// Starts a download for every source not cached or in flight yet.
fn fetch_images(ctx: &mut UpdateContext<'_>, sources: &[String]) -> Task<Message> {
    let Some(client) = ctx.client.clone() else {
        return Task::none();
    };

    let missing = ctx.images.claim_missing(sources);
    if missing.is_empty() {
        return Task::none();
    }
    tracing::debug!(count = missing.len(), "fetching fragment images");

    Task::batch(missing.into_iter().map(|src| {
        let client = client.clone();
        let key = src.clone();
        Task::perform(async move { client.fetch_image(src).await }, move |result| {
            Message::ImageFetched { src: key, result }
        })
    }))
}

pub fn handle_image_fetched(
    ctx: &mut UpdateContext<'_>,
    src: String,
    result: Result<Vec<u8>, Error>,
) -> Task<Message> {
    match result {
        Ok(bytes) => ctx.images.insert(src, bytes),
        Err(err) => {
            // The fragment falls back to the alt text
            tracing::debug!(%src, error = %err, "fragment image failed");
            ctx.images.mark_failed(src);
        }
    }
    Task::none()
}

// =============================================================================
// Image selection
// =============================================================================

/// Opens the native file dialog filtered on the allowed extensions.
pub fn open_image_dialog(allowed: &AllowedExtensions) -> Task<Message> {
    let extensions = allowed.dialog_filter();
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new();
            if !extensions.is_empty() {
                dialog = dialog.add_filter("Images", extensions.as_slice());
            }
            dialog.pick_file().await.map(|h| h.path().to_path_buf())
        },
        Message::ImagePicked,
    )
}

/// Handles the result of the file dialog.
pub fn handle_image_picked(path: Option<PathBuf>) -> Task<Message> {
    let Some(path) = path else {
        // User cancelled the dialog
        return Task::none();
    };
    select_image(path)
}

/// Drops are only accepted while the input form is editable.
pub fn handle_file_dropped(ctx: &mut UpdateContext<'_>, path: PathBuf) -> Task<Message> {
    let navigation = &ctx.session.navigation;
    if navigation.mode() != Mode::Input || navigation.page() != Page::Index {
        tracing::debug!(path = %path.display(), "ignoring drop outside the input form");
        return Task::none();
    }
    select_image(path)
}

/// Reads name and size; the contents are only loaded after validation.
pub fn select_image(path: PathBuf) -> Task<Message> {
    Task::perform(PickedFile::inspect(path), Message::ImageInspected)
}

pub fn handle_image_inspected(
    ctx: &mut UpdateContext<'_>,
    result: Result<PickedFile, Error>,
) -> Task<Message> {
    let picked = match result {
        Ok(picked) => picked,
        Err(err) => {
            tracing::warn!(error = %err, "cannot read picked image");
            ctx.notifications.push(Notification::from_error(&err));
            return Task::none();
        }
    };

    match validate_image(&picked.name, picked.size, ctx.limits) {
        Ok(()) => Task::perform(picked.load(), Message::ImageLoaded),
        Err(rejection) => {
            tracing::info!(file = %picked.name, size = picked.size, ?rejection, "image rejected");
            *ctx.modal = Some(Modal::for_rejection(
                &rejection,
                &ctx.limits.allowed_extensions,
            ));
            ctx.session.clear_image();
            Task::none()
        }
    }
}

pub fn handle_image_loaded(
    ctx: &mut UpdateContext<'_>,
    result: Result<SelectedImage, Error>,
) -> Task<Message> {
    match result {
        Ok(file) => {
            tracing::debug!(file = %file.name, size = file.size, "image selected");
            ctx.session.attach_image(file);
        }
        Err(err) => {
            tracing::warn!(error = %err, "cannot load picked image");
            ctx.session.clear_image();
            ctx.notifications.push(Notification::from_error(&err));
        }
    }
    Task::none()
}

// =============================================================================
// Server session
// =============================================================================

/// Startup requests: login first when a password is configured, so the
/// session cookie is in place for everything after it.
pub fn connect(
    client: SearchClient,
    password: Option<String>,
    locale: String,
    fetch_page_globals: bool,
) -> Task<Message> {
    match password {
        Some(password) => Task::perform(
            async move { client.login(&password).await },
            Message::LoggedIn,
        ),
        None => prepare_session(client, locale, fetch_page_globals),
    }
}

/// Locale cookie and, when enabled, the server's upload limits.
fn prepare_session(client: SearchClient, locale: String, fetch_page_globals: bool) -> Task<Message> {
    let locale_client = client.clone();
    let locale_task = Task::perform(
        async move { locale_client.select_locale(&locale).await },
        Message::LocaleSelected,
    );

    if fetch_page_globals {
        let globals_task = Task::perform(
            async move { client.fetch_page_globals().await },
            Message::PageGlobalsLoaded,
        );
        Task::batch([locale_task, globals_task])
    } else {
        locale_task
    }
}

pub fn handle_logged_in(ctx: &mut UpdateContext<'_>, result: Result<bool, Error>) -> Task<Message> {
    match result {
        Ok(true) => tracing::info!("logged in"),
        Ok(false) => {
            ctx.notifications
                .push(Notification::error("notification-login-failed"));
        }
        Err(err) => {
            tracing::warn!(error = %err, "login request failed");
            ctx.notifications.push(Notification::from_error(&err));
            return Task::none();
        }
    }

    match ctx.client {
        Some(client) => prepare_session(
            client.clone(),
            ctx.i18n.current_locale().to_string(),
            ctx.config.server.fetch_page_globals,
        ),
        None => Task::none(),
    }
}

pub fn handle_locale_selected(
    ctx: &mut UpdateContext<'_>,
    result: Result<(), Error>,
) -> Task<Message> {
    match result {
        // Server text follows the new locale from here on
        Ok(()) if ctx.session.navigation.page() == Page::Help => load_help(ctx),
        Ok(()) => Task::none(),
        Err(err) => {
            tracing::warn!(error = %err, "server locale not changed");
            Task::none()
        }
    }
}

pub fn handle_page_globals(
    ctx: &mut UpdateContext<'_>,
    result: Result<PageGlobals, Error>,
) -> Task<Message> {
    match result {
        Ok(globals) if globals.is_empty() => {
            tracing::debug!("server publishes no upload limits, keeping configuration");
        }
        Ok(globals) => {
            let fallback = UploadLimits::from_config(&ctx.config.upload);
            *ctx.limits = globals.apply_to(&fallback);
            tracing::info!(
                max_upload_size = ctx.limits.max_upload_size,
                allowed_extensions = ctx.limits.allowed_extensions.as_str(),
                max_chars = ctx.limits.max_chars_text_filter,
                "using server upload limits"
            );
        }
        Err(err) => {
            tracing::warn!(error = %err, "cannot read server upload limits");
            ctx.notifications.push(Notification::from_error(&err));
        }
    }
    Task::none()
}

/// Switches the UI language, remembers it and asks the server to follow.
pub fn select_language(
    ctx: &mut UpdateContext<'_>,
    locale: LanguageIdentifier,
) -> Task<Message> {
    ctx.i18n.set_locale(locale.clone());
    let code = ctx.i18n.current_locale().to_string();
    ctx.config.general.language = Some(code.clone());

    if let Err(err) = config::save(ctx.config) {
        tracing::warn!(error = %err, "cannot save language preference");
        ctx.notifications
            .push(Notification::warning("notification-config-save-error"));
    }

    match ctx.client {
        Some(client) => {
            let client = client.clone();
            Task::perform(
                async move { client.select_locale(&code).await },
                Message::LocaleSelected,
            )
        }
        None => Task::none(),
    }
}
