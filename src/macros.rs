/// Construct a [`Bson`](crate::Bson) value from a literal.
///
/// ```rust
/// use mongoextjson::bson;
///
/// let value = bson!({
///     "code": 200,
///     "success": true,
///     "payload": {
///         "some": ["pay", "loads"],
///         "missing": null,
///     }
/// });
/// ```
#[macro_export]
macro_rules! bson {
    (@array [$($elems:expr,)*]) => {
        ::std::vec![$($elems,)*]
    };

    (@array [$($elems:expr,)*] null $(, $($rest:tt)*)?) => {
        $crate::bson!(@array [$($elems,)* $crate::Bson::Null,] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] [$($array:tt)*] $(, $($rest:tt)*)?) => {
        $crate::bson!(@array [$($elems,)* $crate::bson!([$($array)*]),] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] {$($map:tt)*} $(, $($rest:tt)*)?) => {
        $crate::bson!(@array [$($elems,)* $crate::bson!({$($map)*}),] $($($rest)*)?)
    };

    (@array [$($elems:expr,)*] $next:expr $(, $($rest:tt)*)?) => {
        $crate::bson!(@array [$($elems,)* $crate::Bson::from($next),] $($($rest)*)?)
    };

    (null) => {
        $crate::Bson::Null
    };

    ([]) => {
        $crate::Bson::Array(::std::vec::Vec::new())
    };

    ([ $($tt:tt)+ ]) => {
        $crate::Bson::Array($crate::bson!(@array [] $($tt)+))
    };

    ({ $($tt:tt)* }) => {
        $crate::Bson::Document($crate::doc! { $($tt)* })
    };

    ($other:expr) => {
        $crate::Bson::from($other)
    };
}

/// Construct a [`Document`](crate::Document). Keys are string literals and keep the order in
/// which they are written.
///
/// ```rust
/// use mongoextjson::doc;
///
/// let doc = doc! {
///     "code": 200,
///     "success": true,
///     "payload": {
///         "some": ["pay", "loads"],
///     }
/// };
/// assert_eq!(doc.keys().collect::<Vec<_>>(), ["code", "success", "payload"]);
/// ```
#[macro_export]
macro_rules! doc {
    (@object $object:ident) => {};

    (@object $object:ident $key:literal : null $(, $($rest:tt)*)?) => {
        $object.insert($key, $crate::Bson::Null);
        $crate::doc!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:literal : [$($array:tt)*] $(, $($rest:tt)*)?) => {
        $object.insert($key, $crate::bson!([$($array)*]));
        $crate::doc!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:literal : {$($map:tt)*} $(, $($rest:tt)*)?) => {
        $object.insert($key, $crate::bson!({$($map)*}));
        $crate::doc!(@object $object $($($rest)*)?);
    };

    (@object $object:ident $key:literal : $value:expr $(, $($rest:tt)*)?) => {
        $object.insert($key, $crate::Bson::from($value));
        $crate::doc!(@object $object $($($rest)*)?);
    };

    () => {
        $crate::Document::new()
    };

    ( $($tt:tt)+ ) => {{
        let mut object = $crate::Document::new();
        $crate::doc!(@object object $($tt)+);
        object
    }};
}
