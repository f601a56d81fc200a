use locator_runtime::mount::set_editor_protocol;
use locator_runtime::{
    is_mounted, mount, EditorProtocol, MemoryHost, MemoryStore, Mounted, OverlayOptions,
};

fn mount_with(protocol: EditorProtocol) -> Mounted<MemoryHost, MemoryStore> {
    mount(
        OverlayOptions::default().with_editor_protocol(protocol),
        MemoryStore::new(),
    )
}

#[test]
fn test_second_mount_updates_in_place() {
    let handle = mount_with(EditorProtocol::VsCode).into_handle().unwrap();
    assert!(is_mounted());

    let second = mount_with(EditorProtocol::Zed);
    assert!(matches!(second, Mounted::Updated));
    assert_eq!(
        handle.controller().borrow().settings().editor_protocol,
        EditorProtocol::Zed
    );

    assert!(set_editor_protocol(EditorProtocol::Cursor));
    assert_eq!(
        handle.controller().borrow().settings().editor_protocol,
        EditorProtocol::Cursor
    );
}

#[test]
fn test_unmount_allows_fresh_mount() {
    let handle = mount_with(EditorProtocol::VsCode).into_handle().unwrap();
    handle.unmount();
    assert!(!is_mounted());
    assert!(!set_editor_protocol(EditorProtocol::Zed));

    let fresh = mount_with(EditorProtocol::Cursor);
    assert!(matches!(fresh, Mounted::Created(_)));
    assert!(is_mounted());
    drop(fresh);
    assert!(!is_mounted());
}

#[test]
fn test_mount_is_per_thread() {
    let _handle = mount_with(EditorProtocol::VsCode).into_handle().unwrap();
    let other = std::thread::spawn(is_mounted).join().unwrap();
    assert!(!other);
}
