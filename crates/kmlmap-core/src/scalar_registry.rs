///
/// Scalar Registry
///
/// Single source of truth for the built-in scalar codecs shared across the core.
///

// NOTE: Only entries flagged `numeric = true` get a generated `Scalar` impl.
// bool, String and Color32 carry hand-written impls because their textual
// forms are not plain `FromStr`/`Display`.
// NOTE: Tags are stable identifiers; renaming one breaks codecs registered
// against it by callers.
macro_rules! scalar_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (bool, "bool", numeric = false, sample = true),
            (i32, "int", numeric = true, sample = -7_i32),
            (i64, "long", numeric = true, sample = 42_i64),
            (u32, "uint", numeric = true, sample = 7_u32),
            (u64, "ulong", numeric = true, sample = 9_u64),
            (f32, "float", numeric = true, sample = 1.25_f32),
            (f64, "double", numeric = true, sample = 2.5_f64),
            (String, "string", numeric = false, sample = String::from("example")),
            (crate::codec::Color32, "color", numeric = false, sample = crate::codec::Color32::WHITE),
        }
    };
}

macro_rules! scalar_registry {
    ($macro:ident) => {
        scalar_registry_entries! { $macro }
    };
    ($macro:ident, $($args:tt)+) => {
        scalar_registry_entries! { $macro, @args $($args)+ }
    };
}
