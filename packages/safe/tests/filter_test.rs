//! Allow-list matching, absorption and escape

mod common;

use common::{range, type_error, RangeError, TypeError};
use safe::{BoxError, ErrorAllowList, ErrorFilter, ErrorKind, ErrorTransform, Panicked};

#[test]
fn test_kind_matches_concrete_type_only() {
    let kind = ErrorKind::of::<RangeError>();
    let range_error: BoxError = range("bad").into();
    let type_err: BoxError = type_error("bad").into();
    let plain: BoxError = "bad".into();

    assert!(kind.matches(&*range_error));
    assert!(!kind.matches(&*type_err));
    assert!(!kind.matches(&*plain));
    assert!(kind.name().ends_with("RangeError"));
}

#[test]
fn test_kind_matches_boxed_concrete_type() {
    let kind = ErrorKind::of::<RangeError>();
    let boxed: BoxError = Box::new(range("boxed twice")).into();

    assert!(kind.matches(&*boxed));
    assert!(!ErrorKind::of::<TypeError>().matches(&*boxed));
    assert!(ErrorAllowList::new().with::<RangeError>().admits(&*boxed));
}

#[test]
fn test_kind_equality_is_by_type() {
    assert_eq!(ErrorKind::of::<RangeError>(), ErrorKind::of::<RangeError>());
    assert_ne!(ErrorKind::of::<RangeError>(), ErrorKind::of::<TypeError>());
}

#[test]
fn test_empty_list_admits_everything() {
    let allow = ErrorAllowList::new();
    let error: BoxError = range("anything").into();

    assert!(allow.is_empty());
    assert!(allow.admits(&*error));
    assert!(allow.matching(&*error).is_none());
}

#[test]
fn test_list_admits_members_in_order() {
    let allow = ErrorAllowList::new().with::<TypeError>().with::<RangeError>();
    let error: BoxError = range("listed").into();
    let other: BoxError = std::io::Error::other("unlisted").into();

    assert_eq!(allow.len(), 2);
    assert!(allow.admits(&*error));
    assert!(!allow.admits(&*other));
    assert_eq!(
        allow.matching(&*error),
        Some(&ErrorKind::of::<RangeError>())
    );

    let names: Vec<&str> = allow.iter().map(ErrorKind::name).collect();
    assert!(names[0].ends_with("TypeError"));
    assert!(names[1].ends_with("RangeError"));
}

#[test]
fn test_list_from_collections() {
    let from_array = ErrorAllowList::from([ErrorKind::of::<RangeError>()]);
    let collected: ErrorAllowList = [ErrorKind::of::<RangeError>()].into_iter().collect();
    let from_vec = ErrorAllowList::from(vec![ErrorKind::of::<RangeError>()]);

    assert_eq!(from_array, collected);
    assert_eq!(collected, from_vec);
}

#[test]
fn test_filter_absorbs_listed_error() {
    let filter = ErrorFilter::new(ErrorAllowList::new().with::<RangeError>(), None);

    let tuple = common::settled(filter.absorb::<i32>(range("absorbed").into()))
        .expect("listed error should be absorbed");
    let (error, value) = tuple.into_parts();

    assert!(value.is_none());
    let error = error.expect("error side should be present");
    assert_eq!(error.downcast_ref::<RangeError>(), Some(&range("absorbed")));
}

#[test]
fn test_filter_escapes_unlisted_error_unchanged() {
    let filter = ErrorFilter::new(ErrorAllowList::new().with::<TypeError>(), None);
    let error: BoxError = range("escaped").into();
    let address = &*error as *const _ as *const () as usize;

    let escaped = common::settled(filter.absorb::<i32>(error))
        .expect_err("unlisted error should escape");

    assert_eq!(&*escaped as *const _ as *const () as usize, address);
    assert_eq!(escaped.downcast_ref::<RangeError>(), Some(&range("escaped")));
}

#[test]
fn test_filter_does_not_transform_escaping_errors() {
    let transform = ErrorTransform::new(|_error: BoxError| -> BoxError { "rewritten".into() });
    let filter = ErrorFilter::new(ErrorAllowList::new().with::<TypeError>(), Some(transform));

    let escaped = common::settled(filter.absorb::<()>(range("untouched").into()))
        .expect_err("unlisted error should escape");
    assert_eq!(escaped.to_string(), "untouched");
}

#[test]
fn test_transform_folds_every_path_into_error_side() {
    let replace = ErrorTransform::new(|error: BoxError| -> BoxError {
        type_error(&format!("replaced: {error}")).into()
    });
    let fail =
        ErrorTransform::new(|_error: BoxError| Err::<BoxError, _>(range("transform failed")));
    let explode =
        ErrorTransform::new(|_error: BoxError| -> BoxError { panic!("transform exploded") });

    let settle = |transform: &ErrorTransform| {
        match transform.apply::<u8>(range("source").into()).try_ready() {
            Ok(Ok(tuple)) => tuple.into_parts(),
            Ok(Err(never)) => match never {},
            Err(pending) => panic!("sync transform should settle, got {pending:?}"),
        }
    };

    let (error, value) = settle(&replace);
    assert!(value.is_none());
    assert_eq!(
        error.expect("replacement").downcast_ref::<TypeError>(),
        Some(&type_error("replaced: source"))
    );

    let (error, _) = settle(&fail);
    assert_eq!(
        error.expect("failure").downcast_ref::<RangeError>(),
        Some(&range("transform failed"))
    );

    let (error, _) = settle(&explode);
    let error = error.expect("panic");
    assert_eq!(
        error.downcast_ref::<Panicked>().map(Panicked::message),
        Some("transform exploded")
    );
}

#[tokio::test]
async fn test_async_transform_settles_both_ways() {
    let resolve = ErrorTransform::new(|error: BoxError| {
        safe::thenable(async move { Ok::<BoxError, BoxError>(format!("async: {error}").into()) })
    });
    let reject = ErrorTransform::new(|_error: BoxError| {
        safe::thenable(async { Err::<BoxError, _>(type_error("async failure")) })
    });

    let produced = resolve.apply::<()>(range("source").into());
    assert!(produced.is_pending());
    let (error, value) = match produced.await {
        Ok(tuple) => tuple.into_parts(),
        Err(never) => match never {},
    };
    assert!(value.is_none());
    assert_eq!(error.expect("replacement").to_string(), "async: source");

    let produced = reject.apply::<()>(range("source").into());
    let (error, _) = match produced.await {
        Ok(tuple) => tuple.into_parts(),
        Err(never) => match never {},
    };
    assert!(error.expect("rejection").is::<TypeError>());
}
