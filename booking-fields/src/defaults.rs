//! Built-in booking form.
//!
//! `booking_defaults()` provides the system booking questions every event
//! type starts with. Pass it to `FormContext::open().with_defaults()` to seed
//! the store on first open; forms already on disk are left untouched.

use crate::context::FormDefaults;
use crate::types::{BookingForm, FieldDef, FieldType, OptionInput, SelectOption, VariantsConfig};

/// Slug of the built-in booking form.
pub const BOOKING_FORM: &str = "booking";

/// The system booking form, ready for seeding.
pub fn booking_defaults() -> FormDefaults {
    FormDefaults::new().form(booking_form())
}

/// The system booking questions in display order.
pub fn booking_form() -> BookingForm {
    BookingForm::new(
        BOOKING_FORM,
        vec![
            FieldDef::new("name", FieldType::Name)
                .with_label("Your name")
                .required()
                .with_variant("fullName")
                .with_variants_config(VariantsConfig::name_defaults()),
            FieldDef::new("email", FieldType::Email)
                .with_label("Email address")
                .required(),
            FieldDef::new("location", FieldType::RadioInput)
                .with_label("Location")
                .with_options(vec![
                    SelectOption::new("In person (attendee address)", "attendeeInPerson"),
                    SelectOption::new("Phone call", "phone"),
                    SelectOption::new("Somewhere else", "somewhereElse"),
                ])
                .with_option_input(
                    "attendeeInPerson",
                    OptionInput {
                        required: true,
                        placeholder: Some("Enter address".into()),
                        ..OptionInput::new(FieldType::Address)
                    },
                )
                .with_option_input(
                    "phone",
                    OptionInput {
                        required: true,
                        placeholder: Some("Enter phone number".into()),
                        ..OptionInput::new(FieldType::Phone)
                    },
                )
                .with_option_input(
                    "somewhereElse",
                    OptionInput {
                        required: true,
                        placeholder: Some("Any location".into()),
                        ..OptionInput::new(FieldType::Text)
                    },
                ),
            FieldDef::new("title", FieldType::Text).with_label("What is this meeting about?"),
            FieldDef::new("notes", FieldType::Textarea)
                .with_label("Additional notes")
                .with_placeholder("Please share anything that will help prepare for our meeting."),
            FieldDef::new("guests", FieldType::Multiemail).with_label("Add guests"),
            FieldDef::new("rescheduleReason", FieldType::Textarea)
                .with_label("Reason for reschedule")
                .with_placeholder("Let others know why you need to reschedule"),
            FieldDef {
                hidden: true,
                ..FieldDef::new("attendeePhoneNumber", FieldType::Phone)
                    .with_label("Phone number")
            },
        ],
    )
}
