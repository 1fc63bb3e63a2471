use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed grouping a contact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Friends,
    Work,
    Family,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Friends, Self::Work, Self::Family];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Friends => "friends",
            Self::Work => "work",
            Self::Family => "family",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Friends => "Friends",
            Self::Work => "Work",
            Self::Family => "Family",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friends" => Ok(Self::Friends),
            "work" => Ok(Self::Work),
            "family" => Ok(Self::Family),
            other => anyhow::bail!("unknown category: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: String,
    pub email: String,
}

/// Single editable field of a [`Contact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Phone,
    Email,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

/// Per-session contact book, partitioned by [`Category`].
///
/// Every category always has a (possibly empty) bucket, so lookups never miss
/// on the category level. The repository does no validation of its own:
/// `create` overwrites an existing entry with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    friends: BTreeMap<String, Contact>,
    work: BTreeMap<String, Contact>,
    family: BTreeMap<String, Contact>,
}

impl ContactList {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, category: Category) -> &BTreeMap<String, Contact> {
        match category {
            Category::Friends => &self.friends,
            Category::Work => &self.work,
            Category::Family => &self.family,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut BTreeMap<String, Contact> {
        match category {
            Category::Friends => &mut self.friends,
            Category::Work => &mut self.work,
            Category::Family => &mut self.family,
        }
    }

    pub fn create(&mut self, category: Category, name: impl Into<String>, contact: Contact) {
        self.bucket_mut(category).insert(name.into(), contact);
    }

    pub fn read(&self, category: Category, name: &str) -> Option<&Contact> {
        self.bucket(category).get(name)
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.bucket(category).contains_key(name)
    }

    /// Set one field of an existing contact. Returns `false` if there is no
    /// such contact.
    pub fn update(
        &mut self,
        category: Category,
        name: &str,
        field: ContactField,
        value: impl Into<String>,
    ) -> bool {
        let Some(contact) = self.bucket_mut(category).get_mut(name) else {
            return false;
        };
        match field {
            ContactField::Phone => contact.phone = value.into(),
            ContactField::Email => contact.email = value.into(),
        }
        true
    }

    /// Remove a contact. Removing an absent contact is a no-op.
    pub fn delete(&mut self, category: Category, name: &str) -> Option<Contact> {
        self.bucket_mut(category).remove(name)
    }

    /// Contacts of one category, ordered by name.
    pub fn contacts(&self, category: Category) -> impl Iterator<Item = (&str, &Contact)> {
        self.bucket(category)
            .iter()
            .map(|(name, contact)| (name.as_str(), contact))
    }

    pub fn has_contacts(&self, category: Category) -> bool {
        !self.bucket(category).is_empty()
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Human-facing form of a contact name: first character upper-cased, the
/// rest lower-cased (`"jILL"` becomes `"Jill"`).
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Percent-encode one URL path segment (`"mary ann"` becomes `"mary%20ann"`).
pub fn path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Path of a contact's detail page, or of one of its sub-pages.
pub fn contact_path(category: Category, name: &str, action: Option<&str>) -> String {
    let base = format!("/{category}/{}", path_segment(name));
    match action {
        Some(action) => format!("{base}/{action}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jill() -> Contact {
        Contact {
            phone: "772-889-9005".into(),
            email: "jill@hotmail.com".into(),
        }
    }

    #[test]
    fn category_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_rejects_unknown_and_wrong_case() {
        assert!("enemies".parse::<Category>().is_err());
        assert!("Friends".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn new_list_has_every_category_empty() {
        let list = ContactList::new();
        for category in Category::ALL {
            assert!(!list.has_contacts(category));
            assert_eq!(list.contacts(category).count(), 0);
        }
        assert!(list.is_empty());
    }

    #[test]
    fn same_name_in_two_categories() {
        let mut list = ContactList::new();
        list.create(Category::Friends, "jill", jill());
        list.create(Category::Work, "jill", jill());

        assert!(list.contains(Category::Friends, "jill"));
        assert!(list.contains(Category::Work, "jill"));
        assert!(!list.contains(Category::Family, "jill"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn create_overwrites_duplicate() {
        let mut list = ContactList::new();
        list.create(Category::Friends, "jill", jill());
        let replacement = Contact {
            phone: "111-222-3333".into(),
            email: "j@x".into(),
        };
        list.create(Category::Friends, "jill", replacement.clone());

        assert_eq!(list.read(Category::Friends, "jill"), Some(&replacement));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut list = ContactList::new();
        list.create(Category::Friends, "jill", jill());
        assert!(list.read(Category::Friends, "Jill").is_none());
    }

    #[test]
    fn update_phone_leaves_email() {
        let mut list = ContactList::new();
        list.create(Category::Friends, "jill", jill());

        assert!(list.update(Category::Friends, "jill", ContactField::Phone, "914-889-0090"));
        let contact = list.read(Category::Friends, "jill").unwrap();
        assert_eq!(contact.phone, "914-889-0090");
        assert_eq!(contact.email, "jill@hotmail.com");
    }

    #[test]
    fn update_email_leaves_phone() {
        let mut list = ContactList::new();
        list.create(Category::Work, "john", jill());

        assert!(list.update(Category::Work, "john", ContactField::Email, "john@hotmail.com"));
        let contact = list.read(Category::Work, "john").unwrap();
        assert_eq!(contact.email, "john@hotmail.com");
        assert_eq!(contact.phone, "772-889-9005");
    }

    #[test]
    fn update_missing_contact_reports_false() {
        let mut list = ContactList::new();
        assert!(!list.update(Category::Family, "nobody", ContactField::Phone, "x"));
        assert!(list.is_empty());
    }

    #[test]
    fn delete_absent_is_noop() {
        let mut list = ContactList::new();
        list.create(Category::Friends, "jill", jill());
        assert!(list.delete(Category::Work, "jill").is_none());
        assert!(list.delete(Category::Friends, "nobody").is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn contacts_are_name_ordered() {
        let mut list = ContactList::new();
        list.create(Category::Family, "zed", jill());
        list.create(Category::Family, "amy", jill());
        list.create(Category::Family, "mia", jill());

        let names: Vec<&str> = list.contacts(Category::Family).map(|(n, _)| n).collect();
        assert_eq!(names, vec!["amy", "mia", "zed"]);
    }

    #[test]
    fn display_name_capitalizes() {
        assert_eq!(display_name("jill"), "Jill");
        assert_eq!(display_name("jILL"), "Jill");
        assert_eq!(display_name("mary ann"), "Mary ann");
        assert_eq!(display_name(""), "");
        assert_eq!(display_name("émile"), "Émile");
    }

    #[test]
    fn path_segment_escapes_reserved_characters() {
        assert_eq!(path_segment("jill"), "jill");
        assert_eq!(path_segment("mary ann"), "mary%20ann");
        assert_eq!(path_segment("a/b"), "a%2Fb");
        assert_eq!(path_segment("a+b"), "a%2Bb");
    }

    #[test]
    fn contact_paths() {
        assert_eq!(contact_path(Category::Friends, "jill", None), "/friends/jill");
        assert_eq!(
            contact_path(Category::Work, "mary ann", Some("edit")),
            "/work/mary%20ann/edit"
        );
    }

    fn any_category() -> impl Strategy<Value = Category> {
        proptest::sample::select(Category::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn create_then_read_roundtrips(
            category in any_category(),
            name in "\\PC{1,100}",
            phone in "[0-9]{3}-[0-9]{3}-[0-9]{4}",
            email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
        ) {
            let mut list = ContactList::new();
            let contact = Contact { phone, email };
            list.create(category, name.clone(), contact.clone());
            prop_assert_eq!(list.read(category, &name), Some(&contact));
        }

        #[test]
        fn delete_then_read_is_absent(
            category in any_category(),
            name in "\\PC{1,100}",
        ) {
            let mut list = ContactList::new();
            list.create(category, name.clone(), jill());
            prop_assert!(list.delete(category, &name).is_some());
            prop_assert!(list.read(category, &name).is_none());
            prop_assert!(list.is_empty());
        }
    }
}
