use leptos::ev::SubmitEvent;
use leptos::*;

use crate::api::{use_api, ApiError, PolicyUpload};
use crate::components::error::ErrorBanner;
use crate::config::POLICY_CATEGORIES;
use crate::state::policy::{self, use_policies};

/// Extensions the backend accepts for policy documents.
const ALLOWED_EXTENSIONS: &[&str] = &[".txt", ".pdf", ".docx", ".csv", ".json"];

#[component]
pub fn PolicyUploadPage() -> impl IntoView {
    let api = use_api();
    let (policy_state, set_policy_state) = use_policies();

    let (title, set_title) = create_signal(String::new());
    let (description, set_description) = create_signal(String::new());
    let (category, set_category) = create_signal(
        POLICY_CATEGORIES
            .first()
            .map(|(value, _)| value.to_string())
            .unwrap_or_default(),
    );
    let (file, set_file) = create_signal(None::<web_sys::File>);
    let (form_error, set_form_error) = create_signal(None::<String>);
    let (uploaded, set_uploaded) = create_signal(None::<String>);

    let upload_action = {
        let api = api.clone();
        create_action(move |_: &()| {
            let api = api.clone();
            async move {
                let Some(selected) = file.get_untracked() else {
                    return Err(ApiError::Storage("no file selected".into()));
                };
                let data = read_file_bytes(&selected).await?;
                let upload = PolicyUpload {
                    title: title.get_untracked().trim().to_string(),
                    description: description.get_untracked().trim().to_string(),
                    category: category.get_untracked(),
                    file_name: selected.name(),
                    data,
                };
                policy::upload_policy(&api, set_policy_state, upload).await
            }
        })
    };
    let pending = upload_action.pending();

    create_effect(move |_| {
        if let Some(Ok(response)) = upload_action.value().get() {
            let message = response
                .message
                .unwrap_or_else(|| "Policy uploaded".to_string());
            set_uploaded.set(Some(message));
        }
    });

    let on_file_change = move |ev: leptos::ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        set_file.set(input.files().and_then(|files| files.get(0)));
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let file_name = file.get_untracked().map(|selected| selected.name());
        if let Err(message) = validate_upload_form(&title.get_untracked(), file_name.as_deref())
        {
            set_form_error.set(Some(message));
            return;
        }
        set_form_error.set(None);
        set_uploaded.set(None);
        upload_action.dispatch(());
    };

    view! {
        <section class="page policy-upload-page">
            <h1>"Upload a policy"</h1>
            <form on:submit=on_submit>
                <label>
                    "Title"
                    <input
                        type="text"
                        prop:value=title
                        on:input=move |ev| set_title.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Description"
                    <textarea
                        prop:value=description
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label>
                    "Category"
                    <select on:change=move |ev| set_category.set(event_target_value(&ev))>
                        {POLICY_CATEGORIES
                            .iter()
                            .map(|(value, label)| {
                                view! { <option value=*value>{*label}</option> }
                            })
                            .collect_view()}
                    </select>
                </label>
                <label>
                    "Document"
                    <input type="file" on:change=on_file_change/>
                </label>
                <ErrorBanner message=Signal::derive(move || {
                    form_error.get().or_else(|| policy_state.get().error)
                })/>
                {move || {
                    uploaded
                        .get()
                        .map(|message| view! { <p class="submit-result">{message}</p> })
                }}
                <button type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Uploading..." } else { "Upload" }}
                </button>
            </form>
        </section>
    }
}

async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, ApiError> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| ApiError::Storage("failed to read the selected file".into()))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

pub fn validate_upload_form(title: &str, file_name: Option<&str>) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Enter a title for the policy".into());
    }
    let Some(file_name) = file_name else {
        return Err("Choose a document to upload".into());
    };
    let lowered = file_name.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS
        .iter()
        .any(|extension| lowered.ends_with(extension))
    {
        return Err(format!(
            "Unsupported file type, expected one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_upload_form;

    #[test]
    fn accepts_supported_extensions_case_insensitively() {
        assert!(validate_upload_form("Leave policy", Some("handbook.pdf")).is_ok());
        assert!(validate_upload_form("Leave policy", Some("HANDBOOK.PDF")).is_ok());
        assert!(validate_upload_form("Leave policy", Some("data.json")).is_ok());
    }

    #[test]
    fn rejects_missing_title_missing_file_and_odd_extensions() {
        assert!(validate_upload_form("  ", Some("handbook.pdf")).is_err());
        assert!(validate_upload_form("Leave policy", None).is_err());
        assert!(validate_upload_form("Leave policy", Some("virus.exe")).is_err());
        assert!(validate_upload_form("Leave policy", Some("archive.tar.gz")).is_err());
    }
}
