pub mod settings_view;
