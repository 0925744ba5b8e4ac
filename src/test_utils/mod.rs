//! Assertions shared by the handler tests.

pub(crate) mod form;
pub(crate) mod response;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use response::{
    assert_content_type, assert_hx_redirect, assert_status_ok, assert_valid_html,
    parse_html_document,
};
