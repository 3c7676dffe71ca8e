//! Example demonstrating the File Store Service
//!
//! Mounts a volume, builds a small tree, hard-links a file and walks the
//! verbs a host integration layer would call.

use services_file_store::{
    DuplicatePolicy, FileStoreOperations, FileStoreService, StoreConfig,
};

fn main() {
    println!("=== File Store Service Demo ===\n");

    let store = FileStoreService::mount(StoreConfig::default()).expect("mount failed");
    let root = store.root();
    println!("Mounted {} with root {}\n", store.volume(), root);

    println!("1. Creating directory structure...");
    let docs = store.mkdir(root, "docs", 0o755).expect("mkdir docs");
    println!("   ✓ Created: /docs ({docs})");

    println!("2. Creating a file and writing content...");
    let readme = store.create(docs, "README.md", 0o644).expect("create README");
    let written = store
        .write(readme, 0, b"# File store demo\n")
        .expect("write README");
    println!("   ✓ Wrote {written} bytes to /docs/README.md ({readme})");

    println!("3. Hard-linking the file under a second name...");
    let alias = store.link(readme, root, "README.md").expect("link README");
    println!("   ✓ Linked: /README.md ({alias}) shares {readme}'s content");

    println!("4. Listing directories...");
    for entry in store.iterate(root, 0).expect("iterate root") {
        println!("   /{} -> {} [{}]", entry.name, entry.id, entry.kind);
    }

    println!("5. Reading through the link after unlinking the original...");
    store.unlink(docs, "README.md", Some(readme)).expect("unlink original");
    let content = store.read(alias, 0, 64).expect("read alias");
    println!(
        "   ✓ /README.md still reads: {:?}",
        String::from_utf8_lossy(&content)
    );

    println!("6. Shadowing policy...");
    let shadow_store =
        FileStoreService::mount(StoreConfig::with_policy(DuplicatePolicy::Shadow))
            .expect("mount failed");
    let sroot = shadow_store.root();
    let first = shadow_store.create(sroot, "note", 0o644).expect("create note");
    let second = shadow_store.create(sroot, "note", 0o644).expect("shadow note");
    println!("   ✓ Second create displaced {first}; name now binds {second}");

    println!("\nDone: {} nodes, {} blocks live", store.node_count(), store.block_count());
}
