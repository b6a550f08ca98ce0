// Internal macro implementations (used only inside tola-invoke itself)

pub mod arity;
