//! Manage the persisted category set

use anyhow::Result;

use crate::Writer;

/// Print the categories, first one marked as the default
pub fn list(writer: &Writer) -> Result<Vec<String>> {
    let store = writer.category_store()?;
    println!("Categories ({}):", store.categories().len());
    for (i, category) in store.categories().iter().enumerate() {
        let marker = if i == 0 { " (default)" } else { "" };
        println!("  {}{}", category, marker);
    }
    Ok(store.categories().to_vec())
}

pub fn add(writer: &Writer, name: &str) -> Result<bool> {
    let mut store = writer.category_store()?;
    let added = store.add(name)?;
    if added {
        println!("Added category: {}", name.trim());
    } else {
        println!("Category not added (blank or already present): {}", name);
    }
    Ok(added)
}

pub fn remove(writer: &Writer, name: &str) -> Result<()> {
    let mut store = writer.category_store()?;
    store.remove(name)?;
    println!("Removed category: {}", name);
    Ok(())
}
