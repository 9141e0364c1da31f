//! Plain-text views.

use roster_core::User;
use roster_sync::{DirectoryController, LoadPhase};
use std::fmt::Write;

use crate::routes::Route;

/// Text for the public views and for protected views that carry no data
/// of their own.
pub fn static_view(route: Route) -> String {
    match route {
        Route::Entry => "Log in\n\n  roster login --email <EMAIL> --password <PASSWORD>\n\n\
                         No account yet? See `roster open /signup`.\n"
            .to_string(),
        Route::Register => {
            "Sign up\n\n  roster register --email <EMAIL> --password <PASSWORD>\n".to_string()
        }
        Route::AddUser => "Add user\n\n  roster add --first-name <FIRST> --last-name <LAST> \
                           --email <EMAIL> [--avatar <URL>]\n"
            .to_string(),
        Route::Users => "Users\n\n  roster users [--page <N>]\n".to_string(),
        Route::EditUser(id) => format!(
            "Edit user {id}\n\n  roster edit {id} [--first-name <FIRST>] [--last-name <LAST>] \
             [--email <EMAIL>]\n"
        ),
    }
}

/// The directory list with its pager and any pending error.
pub fn directory(controller: &DirectoryController) -> String {
    let mut out = String::new();

    if controller.phase() == LoadPhase::Loading {
        out.push_str("Loading...\n");
        return out;
    }

    if let Some(error) = controller.error() {
        let _ = writeln!(out, "! {}", error);
    }

    if controller.users().is_empty() {
        out.push_str("No users on this page.\n");
    } else {
        out.push_str(&user_table(controller.users()));
    }

    let _ = writeln!(
        out,
        "\nPage {} of {}",
        controller.page(),
        controller.total_pages().max(1)
    );
    out
}

/// Users as an aligned table
pub fn user_table(users: &[User]) -> String {
    let id_width = users
        .iter()
        .map(|u| u.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max(2);
    let name_width = users
        .iter()
        .map(|u| u.full_name().len())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(out, "{:>id_width$}  {:<name_width$}  EMAIL", "ID", "NAME");
    for user in users {
        let _ = writeln!(
            out,
            "{:>id_width$}  {:<name_width$}  {}",
            user.id,
            user.full_name(),
            user.email
        );
    }
    out
}

/// One user in full
pub fn user_detail(user: &User) -> String {
    format!(
        "User {}\n  First name: {}\n  Last name:  {}\n  Email:      {}\n  Avatar:     {}\n",
        user.id, user.first_name, user.last_name, user.email, user.avatar
    )
}

/// Confirmation question shown before a delete
pub fn delete_prompt(user: &User) -> String {
    format!("Delete {} <{}>? [y/N] ", user.full_name(), user.email)
}
