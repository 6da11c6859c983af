//! Sender service

use std::sync::Arc;

use tracing::{debug, error, info, trace};

use super::{
    errors::SendError, DeliveryClient, EmailRequest, MailingListDirectory, MessageTemplate,
    RecipientSelection, Recipients,
};

/// Sends a message to every recipient of a selection, one at a time
#[derive(Debug, Clone)]
pub struct SenderService<D, L>
where
    D: DeliveryClient,
    L: MailingListDirectory,
{
    delivery: Arc<D>,
    lists: Arc<L>,
}

impl<D, L> SenderService<D, L>
where
    D: DeliveryClient,
    L: MailingListDirectory,
{
    /// Creates a new sender service.
    pub fn new(delivery: Arc<D>, lists: Arc<L>) -> Self {
        Self { delivery, lists }
    }

    /// Resolves `selection` and sends the templated message to each recipient.
    ///
    /// Recipients from a file are sent to in file order. A failed send is
    /// logged and does not stop the remaining recipients.
    ///
    /// # Returns
    /// [`Err`] only if the recipients could not be resolved or the recipients
    /// file could not be read; nothing further is sent in that case.
    pub async fn send(
        &self,
        selection: RecipientSelection,
        template: &MessageTemplate,
    ) -> Result<(), SendError> {
        match selection.resolve(self.lists.as_ref()).await? {
            Recipients::Single(address) => self.deliver(template.build(&address)).await,
            Recipients::MailingList(list) => self.deliver(template.build(&list.address)).await,
            Recipients::File(mut lines) => {
                while let Some(to) = lines.next_line().await? {
                    self.deliver(template.build(&to)).await;
                }
            }
        }

        Ok(())
    }

    async fn deliver(&self, request: EmailRequest) {
        trace!("{request:?}");
        info!("Sending message...");

        match self.delivery.send_message(&request).await {
            Ok(true) => info!(to = %request.to, "Message sent successfully"),
            Ok(false) => error!(to = %request.to, "Failed to send message"),
            Err(err) => {
                error!(to = %request.to, "{err}");
                debug!("Mailgun message send error: {err:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    use anyhow::anyhow;
    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use crate::domain::messaging::{
        errors::DeliveryError,
        tests::{MockDeliveryClient, MockMailingListDirectory},
        ListInfo,
    };

    use super::*;

    fn template() -> MessageTemplate {
        MessageTemplate::new("me@example.com", "Hi", "hello", "<b>hello</b>")
    }

    fn recipients_file(contents: &str) -> TestResult<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;

        Ok(file)
    }

    fn recording_client(
        outcomes: Vec<Result<bool, &'static str>>,
    ) -> (MockDeliveryClient, Arc<Mutex<Vec<EmailRequest>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let recorded = sent.clone();
        let expected = outcomes.len();
        let mut outcomes = outcomes.into_iter();

        let mut delivery = MockDeliveryClient::new();
        delivery
            .expect_send_message()
            .times(expected)
            .returning(move |request| {
                recorded.lock().unwrap().push(request.clone());

                match outcomes.next() {
                    Some(Ok(accepted)) => Ok(accepted),
                    Some(Err(message)) => Err(DeliveryError::SendFailed(anyhow!(message))),
                    None => Ok(true),
                }
            });

        (delivery, sent)
    }

    fn no_lists() -> MockMailingListDirectory {
        let mut directory = MockMailingListDirectory::new();
        directory.expect_mailing_lists().times(0);
        directory
    }

    #[tokio::test]
    async fn test_send_to_email_address() -> TestResult {
        let (delivery, sent) = recording_client(vec![Ok(true)]);
        let service = SenderService::new(Arc::new(delivery), Arc::new(no_lists()));

        service
            .send(
                RecipientSelection::EmailAddress("a@example.com".to_string()),
                &template(),
            )
            .await?;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@example.com");
        assert_eq!(sent[0].from, "me@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_to_mailing_list() -> TestResult {
        let (delivery, sent) = recording_client(vec![Ok(true)]);

        let mut directory = MockMailingListDirectory::new();
        directory.expect_mailing_lists().times(1).returning(|| {
            Ok(vec![ListInfo {
                address: "news@lists.example.com".to_string(),
                ..Default::default()
            }])
        });

        let service = SenderService::new(Arc::new(delivery), Arc::new(directory));

        service
            .send(
                RecipientSelection::MailingList("news@lists.example.com".to_string()),
                &template(),
            )
            .await?;

        assert_eq!(sent.lock().unwrap()[0].to, "news@lists.example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_mailing_list_sends_nothing() {
        let mut delivery = MockDeliveryClient::new();
        delivery.expect_send_message().times(0);

        let mut directory = MockMailingListDirectory::new();
        directory.expect_mailing_lists().times(1).returning(|| {
            Ok(vec![ListInfo {
                address: "dev@lists.example.com".to_string(),
                ..Default::default()
            }])
        });

        let service = SenderService::new(Arc::new(delivery), Arc::new(directory));

        let result = service
            .send(
                RecipientSelection::MailingList("news@lists.example.com".to_string()),
                &template(),
            )
            .await;

        assert!(matches!(result, Err(SendError::InvalidMailingList { .. })));
    }

    #[tokio::test]
    async fn test_send_to_recipients_file_in_order() -> TestResult {
        let file = recipients_file("a@example.com\nb@example.com\n")?;
        let (delivery, sent) = recording_client(vec![Ok(true), Ok(true)]);
        let service = SenderService::new(Arc::new(delivery), Arc::new(no_lists()));

        service
            .send(
                RecipientSelection::RecipientsFile(file.path().to_path_buf()),
                &template(),
            )
            .await?;

        let sent = sent.lock().unwrap();
        let to: Vec<_> = sent.iter().map(|request| request.to.as_str()).collect();
        assert_eq!(to, vec!["a@example.com", "b@example.com"]);

        for request in sent.iter() {
            assert_eq!(request.subject, "Hi");
            assert_eq!(request.text_body, "hello");
            assert_eq!(request.html_body, "<b>hello</b>");
            assert_eq!(request.from, "me@example.com");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_remaining_recipients() -> TestResult {
        let file = recipients_file("a@example.com\nb@example.com\nc@example.com\nd@example.com\n")?;
        let (delivery, sent) =
            recording_client(vec![Ok(false), Err("connection reset"), Ok(true), Ok(false)]);
        let service = SenderService::new(Arc::new(delivery), Arc::new(no_lists()));

        service
            .send(
                RecipientSelection::RecipientsFile(file.path().to_path_buf()),
                &template(),
            )
            .await?;

        let sent = sent.lock().unwrap();
        let to: Vec<_> = sent.iter().map(|request| request.to.as_str()).collect();
        assert_eq!(
            to,
            vec!["a@example.com", "b@example.com", "c@example.com", "d@example.com"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_recipients_file_sends_nothing() -> TestResult {
        let file = recipients_file("")?;

        let mut delivery = MockDeliveryClient::new();
        delivery.expect_send_message().times(0);

        let service = SenderService::new(Arc::new(delivery), Arc::new(no_lists()));

        service
            .send(
                RecipientSelection::RecipientsFile(file.path().to_path_buf()),
                &template(),
            )
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_addresses_are_sent_twice() -> TestResult {
        let file = recipients_file("a@example.com\na@example.com\n")?;
        let (delivery, sent) = recording_client(vec![Ok(true), Ok(true)]);
        let service = SenderService::new(Arc::new(delivery), Arc::new(no_lists()));

        service
            .send(
                RecipientSelection::RecipientsFile(file.path().to_path_buf()),
                &template(),
            )
            .await?;

        assert_eq!(sent.lock().unwrap().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_recipients_file_is_fatal() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut delivery = MockDeliveryClient::new();
        delivery.expect_send_message().times(0);

        let service = SenderService::new(Arc::new(delivery), Arc::new(no_lists()));

        let result = service
            .send(
                RecipientSelection::RecipientsFile(dir.path().join("recipients.txt")),
                &template(),
            )
            .await;

        assert!(matches!(result, Err(SendError::RecipientsFile { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_optional_fields_reach_the_client() -> TestResult {
        let (delivery, sent) = recording_client(vec![Ok(true)]);
        let service = SenderService::new(Arc::new(delivery), Arc::new(no_lists()));

        let template = template()
            .reply_to(Some("replies@example.com".to_string()))
            .campaign_id(Some("spring".to_string()))
            .test_mode(Some("TRUE"));

        service
            .send(
                RecipientSelection::EmailAddress("a@example.com".to_string()),
                &template,
            )
            .await?;

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].reply_to.as_deref(), Some("replies@example.com"));
        assert_eq!(sent[0].campaign_id.as_deref(), Some("spring"));
        assert!(sent[0].test_mode);

        Ok(())
    }
}
