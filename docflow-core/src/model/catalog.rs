//! src/model/catalog.rs
//! ============================================================================
//! # Catalog: in-memory documents, counterparties and invitations
//!
//! Everything the screens list comes from here. The data is built in at
//! startup; mutations (signing, rejecting, adding a document, answering an
//! invitation) live only for the session.

use chrono::{Local, NaiveDate, NaiveDateTime};
use compact_str::{CompactString, format_compact};
use smallvec::SmallVec;
use tracing::{info, instrument};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    RequiresSignature,
    Signed,
    OnApproval,
    Rejected,
}

impl DocumentStatus {
    pub const ALL: [Self; 4] = [
        Self::RequiresSignature,
        Self::Signed,
        Self::OnApproval,
        Self::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::RequiresSignature => "Требует подписания",
            Self::Signed => "Подписан",
            Self::OnApproval => "На согласовании",
            Self::Rejected => "Отказано",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Contract,
    Act,
    Invoice,
    Upd,
    Other,
}

impl DocumentType {
    pub const ALL: [Self; 5] = [
        Self::Contract,
        Self::Act,
        Self::Invoice,
        Self::Upd,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Contract => "Договор",
            Self::Act => "Акт выполненных работ",
            Self::Invoice => "Счет на оплату",
            Self::Upd => "УПД",
            Self::Other => "Другое",
        }
    }
}

/// Kind of step in a document's history timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    Signed,
    Sent,
    Agreed,
    Approved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub company: Option<CompactString>,
    pub person: CompactString,
    pub action: String,
    pub at: NaiveDateTime,
    pub role: Option<CompactString>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: CompactString,
    pub number: CompactString,
    pub doc_type: DocumentType,
    pub title: String,
    pub counterparty: CompactString,
    pub date: NaiveDate,
    /// Kopecks
    pub amount: i64,
    /// Kopecks
    pub vat: i64,
    pub department: CompactString,
    pub package_size: usize,
    pub status: DocumentStatus,
    pub urgent: bool,
    pub comment: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterpartyStatus {
    Invite,
    Accept,
    InList,
}

impl CounterpartyStatus {
    pub const ALL: [Self; 3] = [Self::Invite, Self::Accept, Self::InList];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Invite => "Можно пригласить",
            Self::Accept => "Приглашает вас",
            Self::InList => "В списке",
        }
    }

    /// Text of the row action for this status.
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Invite => "Пригласить",
            Self::Accept => "Принять приглашение",
            Self::InList => "В списке ваших контрагентов",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterparty {
    pub id: CompactString,
    pub name: CompactString,
    pub inn: CompactString,
    pub kpp: CompactString,
    pub address: CompactString,
    pub status: CounterpartyStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub id: CompactString,
    pub name: CompactString,
    pub inn: CompactString,
    pub kpp: CompactString,
    pub address: CompactString,
    pub invited_at: NaiveDate,
}

/// Counterparty choice offered by the add-document form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterpartyOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub const FORM_COUNTERPARTIES: [CounterpartyOption; 4] = [
    CounterpartyOption {
        id: "org1",
        label: "ООО \"Альфа\"",
    },
    CounterpartyOption {
        id: "org2",
        label: "ООО \"Бета Технологии\"",
    },
    CounterpartyOption {
        id: "org3",
        label: "АО \"Гамма Сервис\"",
    },
    CounterpartyOption {
        id: "org4",
        label: "ИП Иванов И.И.",
    },
];

/// A validated add-document form, ready to become a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDraft {
    pub doc_type: DocumentType,
    pub number: CompactString,
    pub date: NaiveDate,
    pub amount: i64,
    pub counterparty: CompactString,
    pub comment: String,
    pub require_signature: bool,
    pub notify_email: bool,
    pub urgent: bool,
    pub attachments: SmallVec<[CompactString; 4]>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    documents: Vec<Document>,
    counterparties: Vec<Counterparty>,
    invitations: Vec<Invitation>,
    next_document_id: u32,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::mock()
    }
}

impl Catalog {
    /// Built-in demo data set.
    pub fn mock() -> Self {
        let documents = mock_documents();
        let next_document_id = documents.len() as u32 + 1;
        Self {
            documents,
            counterparties: mock_counterparties(),
            invitations: mock_invitations(),
            next_document_id,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn counterparties(&self) -> &[Counterparty] {
        &self.counterparties
    }

    pub fn invitations(&self) -> &[Invitation] {
        &self.invitations
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    fn document_mut(&mut self, id: &str) -> Result<&mut Document, AppError> {
        self.documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("Document", id))
    }

    /// Mark a document signed by `person` and record it in the history.
    #[instrument(level = "info", skip(self))]
    pub fn sign_document(&mut self, id: &str, person: &str) -> Result<(), AppError> {
        let doc = self.document_mut(id)?;
        doc.status = DocumentStatus::Signed;
        doc.history.push(HistoryEntry {
            kind: HistoryKind::Signed,
            company: None,
            person: person.into(),
            action: "подписал документ".to_string(),
            at: Local::now().naive_local(),
            role: None,
        });
        info!("document signed");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    pub fn reject_document(&mut self, id: &str) -> Result<(), AppError> {
        self.document_mut(id)?.status = DocumentStatus::Rejected;
        info!("document rejected");
        Ok(())
    }

    /// Hand a document over for internal approval.
    #[instrument(level = "info", skip(self))]
    pub fn send_for_approval(&mut self, id: &str, person: &str) -> Result<(), AppError> {
        let doc = self.document_mut(id)?;
        doc.status = DocumentStatus::OnApproval;
        doc.history.push(HistoryEntry {
            kind: HistoryKind::Sent,
            company: None,
            person: person.into(),
            action: "передал документ на согласование".to_string(),
            at: Local::now().naive_local(),
            role: None,
        });
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    pub fn delete_document(&mut self, id: &str) -> Result<Document, AppError> {
        let pos = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("Document", id))?;
        Ok(self.documents.remove(pos))
    }

    /// Create a document from a submitted form; returns the new id.
    #[instrument(level = "info", skip(self, draft, author), fields(number = %draft.number))]
    pub fn add_document(
        &mut self,
        draft: DocumentDraft,
        organization: &str,
        author: &str,
    ) -> CompactString {
        let id = format_compact!("{}", self.next_document_id);
        self.next_document_id += 1;

        let status = if draft.require_signature {
            DocumentStatus::RequiresSignature
        } else {
            DocumentStatus::Signed
        };

        let title = format!(
            "{} №{} от {}",
            draft.doc_type.label(),
            draft.number,
            draft.date.format("%d.%m.%Y")
        );

        let mut action = format!("создал и отправил документ: {}", draft.counterparty);
        if draft.notify_email {
            action.push_str(" (уведомление по email)");
        }

        let doc = Document {
            id: id.clone(),
            number: draft.number,
            doc_type: draft.doc_type,
            title,
            counterparty: draft.counterparty,
            date: draft.date,
            amount: draft.amount,
            vat: 0,
            department: "Головное подразделение".into(),
            package_size: draft.attachments.len().max(1),
            status,
            urgent: draft.urgent,
            comment: draft.comment,
            history: vec![HistoryEntry {
                kind: HistoryKind::Sent,
                company: Some(organization.into()),
                person: author.into(),
                action,
                at: Local::now().naive_local(),
                role: None,
            }],
        };

        info!(%id, ?status, attachments = doc.package_size, "document added");
        self.documents.insert(0, doc);
        id
    }

    /// Accepting and declining both take the invitation off the list.
    #[instrument(level = "info", skip(self))]
    pub fn answer_invitation(&mut self, id: &str, accept: bool) -> Result<Invitation, AppError> {
        let pos = self
            .invitations
            .iter()
            .position(|inv| inv.id == id)
            .ok_or_else(|| AppError::not_found("Invitation", id))?;
        let invitation = self.invitations.remove(pos);
        info!(name = %invitation.name, accept, "invitation answered");
        Ok(invitation)
    }

    /// Send an invitation to a counterparty that is not connected yet.
    #[instrument(level = "info", skip(self))]
    pub fn invite_counterparty(&mut self, id: &str) -> Result<(), AppError> {
        let cp = self
            .counterparties
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Counterparty", id))?;

        match cp.status {
            CounterpartyStatus::Invite | CounterpartyStatus::Accept => {
                cp.status = CounterpartyStatus::InList;
                Ok(())
            }
            CounterpartyStatus::InList => Err(AppError::invalid_input(
                "counterparty",
                "already in your counterparty list",
            )),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap_or_default()
}

fn entry(
    kind: HistoryKind,
    company: Option<&str>,
    person: &str,
    action: &str,
    role: &str,
) -> HistoryEntry {
    HistoryEntry {
        kind,
        company: company.map(CompactString::from),
        person: person.into(),
        action: action.to_string(),
        at: at(2025, 1, 2, 12, 0),
        role: Some(role.into()),
    }
}

fn full_history() -> Vec<HistoryEntry> {
    use HistoryKind::*;
    vec![
        entry(
            Signed,
            Some("ООО \"Рога и копыта\""),
            "Иванов И.И.",
            "подписал и отправил документ",
            "Компания",
        ),
        entry(
            Approved,
            Some("ООО \"Какое-то очень длинное название компании\""),
            "Петров П.П.",
            "получил документ",
            "Головное подразделение",
        ),
        entry(
            Sent,
            None,
            "Петров П. П.",
            "передал документ на согласование сотруднику: Дмитриев Д. Д.",
            "Менеджер",
        ),
        entry(
            Agreed,
            None,
            "Дмитриев Д. Д.",
            "согласовал и передал документ на согласование сотруднику: Краснова И.И.",
            "Директор",
        ),
        entry(
            Approved,
            None,
            "Краснова И.И.",
            "согласовала документ и передавала на подписание сотруднику: Дмитриев Д.Д.",
            "Бухгалтер",
        ),
        entry(
            Signed,
            None,
            "Дмитриев Д. Д.",
            "подписал и завершил документооборот",
            "Директор",
        ),
    ]
}

struct Seed {
    number: &'static str,
    doc_type: DocumentType,
    title: &'static str,
    counterparty: &'static str,
    date: (i32, u32, u32),
    amount: i64,
    vat: i64,
    status: DocumentStatus,
}

const SEEDS: [Seed; 6] = [
    Seed {
        number: "9999",
        doc_type: DocumentType::Act,
        title: "Входящий акт №9999 от 01.01.2025",
        counterparty: "ООО \"Рога и копыта\"",
        date: (2025, 1, 1),
        amount: 9_999_900,
        vat: 999_900,
        status: DocumentStatus::RequiresSignature,
    },
    Seed {
        number: "1024",
        doc_type: DocumentType::Contract,
        title: "Договор поставки №1024 от 10.02.2025",
        counterparty: "ООО \"Альфа\"",
        date: (2025, 2, 10),
        amount: 15_000_000,
        vat: 2_500_000,
        status: DocumentStatus::Signed,
    },
    Seed {
        number: "77",
        doc_type: DocumentType::Invoice,
        title: "Счет на оплату №77 от 15.03.2025",
        counterparty: "ООО \"Бета Технологии\"",
        date: (2025, 3, 15),
        amount: 4_850_000,
        vat: 808_333,
        status: DocumentStatus::OnApproval,
    },
    Seed {
        number: "315",
        doc_type: DocumentType::Upd,
        title: "УПД №315 от 20.03.2025",
        counterparty: "АО \"Гамма Сервис\"",
        date: (2025, 3, 20),
        amount: 1_230_000,
        vat: 205_000,
        status: DocumentStatus::RequiresSignature,
    },
    Seed {
        number: "5",
        doc_type: DocumentType::Act,
        title: "Акт выполненных работ №5 от 01.04.2025",
        counterparty: "ИП Иванов И.И.",
        date: (2025, 4, 1),
        amount: 700_000,
        vat: 0,
        status: DocumentStatus::Rejected,
    },
    Seed {
        number: "12",
        doc_type: DocumentType::Other,
        title: "Акт сверки №12 от 05.04.2025",
        counterparty: "ООО \"Рога и копыта\"",
        date: (2025, 4, 5),
        amount: 0,
        vat: 0,
        status: DocumentStatus::Signed,
    },
];

fn mock_documents() -> Vec<Document> {
    SEEDS
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let history = if i == 0 {
                full_history()
            } else {
                vec![HistoryEntry {
                    kind: HistoryKind::Sent,
                    company: Some(seed.counterparty.into()),
                    person: "Петров П.П.".into(),
                    action: "отправил документ".to_string(),
                    at: at(seed.date.0, seed.date.1, seed.date.2, 10, 30),
                    role: Some("Менеджер".into()),
                }]
            };

            Document {
                id: format_compact!("{}", i + 1),
                number: seed.number.into(),
                doc_type: seed.doc_type,
                title: seed.title.to_string(),
                counterparty: seed.counterparty.into(),
                date: date(seed.date.0, seed.date.1, seed.date.2),
                amount: seed.amount,
                vat: seed.vat,
                department: "Головное подразделение".into(),
                package_size: 1,
                status: seed.status,
                urgent: false,
                comment: String::new(),
                history,
            }
        })
        .collect()
}

fn counterparty(
    id: &str,
    name: &str,
    inn: &str,
    kpp: &str,
    address: &str,
    status: CounterpartyStatus,
) -> Counterparty {
    Counterparty {
        id: id.into(),
        name: name.into(),
        inn: inn.into(),
        kpp: kpp.into(),
        address: address.into(),
        status,
    }
}

fn mock_counterparties() -> Vec<Counterparty> {
    use CounterpartyStatus::*;
    const LONG_NAME: &str = "ООО \"Какая-то длинная рекламная компания\"";
    const MOSCOW: &str = "г. Москва, ул. Тверская, д. 15, офис 302";
    const TULA: &str = "г. Тульская обл., г. Новомосковск, ул. Березовая, д. 1";

    vec![
        counterparty("1", LONG_NAME, "4693801631", "0474273962", MOSCOW, Invite),
        counterparty("2", LONG_NAME, "4693801631", "0474273962", MOSCOW, Invite),
        counterparty("3", LONG_NAME, "1234567890", "0987654321", TULA, Accept),
        counterparty("4", LONG_NAME, "1234567890", "0987654321", TULA, InList),
        counterparty(
            "5",
            "ООО \"Северный ветер\"",
            "7812345678",
            "781201001",
            "г. Санкт-Петербург, ул. Марата, д. 8",
            Invite,
        ),
    ]
}

fn mock_invitations() -> Vec<Invitation> {
    let invitation = |id: &str, name: &str, inn: &str, kpp: &str, address: &str, d: NaiveDate| {
        Invitation {
            id: id.into(),
            name: name.into(),
            inn: inn.into(),
            kpp: kpp.into(),
            address: address.into(),
            invited_at: d,
        }
    };

    vec![
        invitation(
            "1",
            "ООО \"Строительные технологии\"",
            "7701234567",
            "770101001",
            "г. Москва, ул. Ленина, д. 10",
            date(2025, 10, 15),
        ),
        invitation(
            "2",
            "ИП Иванов Иван Иванович",
            "772234567890",
            "-",
            "г. Санкт-Петербург, пр. Невский, д. 45",
            date(2025, 10, 14),
        ),
        invitation(
            "3",
            "ООО \"Торговый дом Восток\"",
            "5004567890",
            "500401001",
            "г. Екатеринбург, ул. Малышева, д. 78",
            date(2025, 10, 12),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(require_signature: bool) -> DocumentDraft {
        DocumentDraft {
            doc_type: DocumentType::Invoice,
            number: "42".into(),
            date: date(2025, 5, 1),
            amount: 10_000,
            counterparty: FORM_COUNTERPARTIES[1].label.into(),
            comment: String::new(),
            require_signature,
            notify_email: true,
            urgent: false,
            attachments: SmallVec::from_iter([CompactString::from("a.pdf")]),
        }
    }

    #[test]
    fn mock_data_matches_screens() {
        let catalog = Catalog::mock();
        assert_eq!(catalog.documents().len(), 6);
        assert_eq!(catalog.counterparties().len(), 5);
        assert_eq!(catalog.invitations().len(), 3);
        assert_eq!(catalog.document("1").map(|d| d.history.len()), Some(6));
    }

    #[test]
    fn signing_updates_status_and_history() {
        let mut catalog = Catalog::mock();
        catalog
            .sign_document("1", "Дмитриев Д. Д.")
            .expect("document exists");

        let doc = catalog.document("1").expect("document exists");
        assert_eq!(doc.status, DocumentStatus::Signed);
        assert_eq!(doc.history.last().map(|h| h.kind), Some(HistoryKind::Signed));

        assert!(matches!(
            catalog.reject_document("404"),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn added_document_goes_first_with_status_from_settings() {
        let mut catalog = Catalog::mock();
        let id = catalog.add_document(draft(true), "ИП Дмитриев", "Дмитрий Дмитриев");
        let doc = &catalog.documents()[0];
        assert_eq!(doc.id, id);
        assert_eq!(doc.status, DocumentStatus::RequiresSignature);
        assert_eq!(doc.title, "Счет на оплату №42 от 01.05.2025");

        let second = catalog.add_document(draft(false), "ИП Дмитриев", "Дмитрий Дмитриев");
        assert_ne!(id, second);
        assert_eq!(catalog.documents()[0].status, DocumentStatus::Signed);
    }

    #[test]
    fn answering_removes_invitation() {
        let mut catalog = Catalog::mock();
        let accepted = catalog.answer_invitation("2", true).expect("exists");
        assert_eq!(accepted.inn, "772234567890");
        catalog.answer_invitation("1", false).expect("exists");

        let left: Vec<_> = catalog.invitations().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(left, ["3"]);
        assert!(catalog.answer_invitation("2", true).is_err());
    }

    #[test]
    fn inviting_moves_counterparty_into_list() {
        let mut catalog = Catalog::mock();
        catalog.invite_counterparty("1").expect("invitable");
        assert_eq!(catalog.counterparties()[0].status, CounterpartyStatus::InList);
        assert!(catalog.invite_counterparty("1").is_err());
    }
}
